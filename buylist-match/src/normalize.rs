//! Key normalization shared by every matching stage.

use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks block (U+0300..=U+036F).
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Fold a name or set into a comparison key.
///
/// Lowercases, decomposes accented letters and drops the accents, then keeps
/// only ASCII letters and digits.
///
/// ```
/// use buylist_match::normalize_for_match;
///
/// assert_eq!(normalize_for_match("Pokémon Center"), "pokemoncenter");
/// assert_eq!(normalize_for_match("  Base Set 2 "), "baseset2");
/// assert_eq!(normalize_for_match("Farfetch'd"), "farfetchd");
/// ```
pub fn normalize_for_match(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Fold a collector number into a comparison key.
///
/// Only the part before a `/` counts, and leading zeros are dropped:
/// `"004/102"` and `"4"` both become `"4"`.
///
/// ```
/// use buylist_match::normalize_number;
///
/// assert_eq!(normalize_number("004/102"), "4");
/// assert_eq!(normalize_number(" SWSH050 "), "swsh050");
/// assert_eq!(normalize_number(""), "");
/// ```
pub fn normalize_number(s: &str) -> String {
    let lower = s.to_lowercase();
    let trimmed = lower.trim();
    let head = trimmed.split('/').next().unwrap_or("");
    head.trim_start_matches('0')
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_empty() {
        assert_eq!(normalize_for_match(""), "");
        assert_eq!(normalize_number(""), "");
    }

    #[test]
    fn drops_punctuation_and_space() {
        assert_eq!(normalize_for_match("Mr. Mime (Jungle)"), "mrmimejungle");
        assert_eq!(normalize_for_match("Nidoran♀"), "nidoran");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(normalize_for_match("FLABÉBÉ"), "flabebe");
        assert_eq!(normalize_for_match("Pokémon"), normalize_for_match("Pokemon"));
    }

    #[test]
    fn non_latin_text_vanishes() {
        assert_eq!(normalize_for_match("ピカチュウ"), "");
    }

    #[test]
    fn number_zero_handling() {
        assert_eq!(normalize_number("000"), "");
        assert_eq!(normalize_number("010/100"), "10");
        // Zeros behind a prefix are not leading.
        assert_eq!(normalize_number("#004"), "004");
    }

    #[test]
    fn number_without_slash() {
        assert_eq!(normalize_number("TG05"), "tg05");
    }
}
