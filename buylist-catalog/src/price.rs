//! Price parsing and money arithmetic.
//!
//! Prices are carried as decimal strings with two fractional digits and
//! summed as integer cents, so totals never pick up floating point drift.

/// Fraction of the source market price the store offers.
pub const BUY_PRICE_NUMERATOR: u128 = 3;
pub const BUY_PRICE_DENOMINATOR: u128 = 4;

/// A leading decimal literal: integer digits plus fractional digits.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decimal<'a> {
    int: &'a str,
    frac: &'a str,
}

/// Find the longest leading `digits[.digits]` or `.digits` prefix of `s`.
fn leading_decimal(s: &str) -> Option<Decimal<'_>> {
    let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
    let rest = &s[int_len..];
    let frac = match rest.strip_prefix('.') {
        Some(after) => {
            let n = after.bytes().take_while(u8::is_ascii_digit).count();
            &after[..n]
        }
        None => "",
    };
    if int_len == 0 && frac.is_empty() {
        return None;
    }
    Some(Decimal {
        int: &s[..int_len],
        frac,
    })
}

/// Scale `d` by `num / den` and round half away from zero to hundredths.
///
/// Returns `None` when the literal is too long for exact integer math.
fn scaled_hundredths(d: &Decimal<'_>, num: u128, den: u128) -> Option<u128> {
    // Fractional digits past 30 cannot move a hundredths result.
    let frac = &d.frac[..d.frac.len().min(30)];
    let mut mantissa: u128 = 0;
    for b in d.int.bytes().chain(frac.bytes()) {
        mantissa = mantissa.checked_mul(10)?.checked_add(u128::from(b - b'0'))?;
    }
    let scale = 10u128.checked_pow(frac.len() as u32)?;
    let numer = mantissa.checked_mul(num)?.checked_mul(100)?;
    let denom = scale.checked_mul(den)?;
    Some(numer.checked_add(denom / 2)? / denom)
}

fn format_hundredths(h: u128) -> String {
    format!("{}.{:02}", h / 100, h % 100)
}

fn fallback_value(d: &Decimal<'_>) -> f64 {
    let int = if d.int.is_empty() { "0" } else { d.int };
    format!("{}.{}0", int, d.frac).parse().unwrap_or(0.0)
}

/// Derive the store's offer price from a raw source price.
///
/// Every character outside `[0-9.]` is discarded first (so `"$1,200.50"`
/// reads as `1200.50`); unparsable input counts as zero.
///
/// ```
/// use buylist_catalog::price::buy_price;
///
/// assert_eq!(buy_price("$12.00"), "9.00");
/// assert_eq!(buy_price("40"), "30.00");
/// assert_eq!(buy_price("n/a"), "0.00");
/// ```
pub fn buy_price(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let Some(d) = leading_decimal(&cleaned) else {
        return "0.00".to_string();
    };
    match scaled_hundredths(&d, BUY_PRICE_NUMERATOR, BUY_PRICE_DENOMINATOR) {
        Some(h) => format_hundredths(h),
        None => {
            let v = fallback_value(&d) * BUY_PRICE_NUMERATOR as f64 / BUY_PRICE_DENOMINATOR as f64;
            format!("{:.2}", v)
        }
    }
}

/// Read a stored price string as integer cents.
///
/// Leading whitespace and an optional `$` are tolerated; anything that does
/// not start with a decimal literal is worth nothing. A literal too long for
/// `u128` cents saturates at `u128::MAX`.
pub fn price_cents(price: &str) -> u128 {
    let s = price.trim_start();
    let s = s.strip_prefix('$').unwrap_or(s);
    match leading_decimal(s) {
        Some(d) => scaled_hundredths(&d, 1, 1).unwrap_or(u128::MAX),
        None => 0,
    }
}

/// Format integer cents as `units.cc`.
pub fn format_cents(cents: u128) -> String {
    format_hundredths(cents)
}

/// Parse a quantity: leading integer digits, anything below 1 becomes 1.
pub fn parse_quantity(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|q| *q >= 1).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_currency_symbols() {
        assert_eq!(buy_price("$1,200.50"), "900.38");
        assert_eq!(buy_price("USD 4.00"), "3.00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        // 0.10 * 0.75 = 0.075
        assert_eq!(buy_price("0.10"), "0.08");
        // 0.02 * 0.75 = 0.015
        assert_eq!(buy_price("0.02"), "0.02");
    }

    #[test]
    fn ignores_trailing_garbage_after_prefix() {
        assert_eq!(buy_price("1.2.3"), "0.90");
        assert_eq!(buy_price(".5"), "0.38");
    }

    #[test]
    fn empty_or_dot_only_is_zero() {
        assert_eq!(buy_price(""), "0.00");
        assert_eq!(buy_price("."), "0.00");
    }

    #[test]
    fn huge_literal_falls_back_to_float() {
        let s = "9".repeat(60);
        let p = buy_price(&s);
        assert!(p.ends_with(".00"));
    }

    #[test]
    fn rounding_near_u128_limit_falls_back() {
        let p = buy_price("1134274.556403128211544582024772560704");
        assert_eq!(p, "850705.92");
    }

    #[test]
    fn large_prices_keep_their_cents() {
        assert_eq!(price_cents("99999999999999999999.99"), 9_999_999_999_999_999_999_999);
        assert_eq!(price_cents(&"9".repeat(60)), u128::MAX);
    }

    #[test]
    fn cents_of_stored_prices() {
        assert_eq!(price_cents("30.00"), 3000);
        assert_eq!(price_cents("1.5"), 150);
        assert_eq!(price_cents("$2.25"), 225);
        assert_eq!(price_cents("abc"), 0);
    }

    #[test]
    fn formats_cents() {
        assert_eq!(format_cents(750), "7.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(0), "0.00");
    }

    #[test]
    fn quantity_defaults_to_one() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity("3x"), 3);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("many"), 1);
    }
}
