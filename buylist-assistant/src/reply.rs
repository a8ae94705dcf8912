//! Cleaning up free-text replies.

/// Remove markdown code fence markers (```` ```json ```` and ```` ``` ````)
/// anywhere in the reply, then trim.
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_string()
}

/// Read a leading integer the way a lenient number parser would:
/// surrounding whitespace, an optional sign, then digits up to the first
/// non-digit. `"2."` is 2; `"Index: 2"` is nothing.
pub fn parse_leading_int(reply: &str) -> Option<i64> {
    let s = reply.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let value: i64 = digits[..len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Interpret a classifier reply as a candidate index.
///
/// Non-numeric replies, negative numbers (including the `-1` sentinel) and
/// indices past the end of the candidate list all mean "no match".
pub fn parse_candidate_index(reply: &str, candidate_count: usize) -> Option<usize> {
    let n = parse_leading_int(reply)?;
    let idx = usize::try_from(n).ok()?;
    (idx < candidate_count).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("  [ ] "), "[ ]");
    }

    #[test]
    fn leading_int_forms() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int(" 12\n"), Some(12));
        assert_eq!(parse_leading_int("2."), Some(2));
        assert_eq!(parse_leading_int("-1"), Some(-1));
        assert_eq!(parse_leading_int("+4"), Some(4));
        assert_eq!(parse_leading_int("7 (Charizard)"), Some(7));
    }

    #[test]
    fn non_numeric_is_none() {
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("none"), None);
        assert_eq!(parse_leading_int("Index: 2"), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn candidate_index_bounds() {
        assert_eq!(parse_candidate_index("0", 3), Some(0));
        assert_eq!(parse_candidate_index("2", 3), Some(2));
        assert_eq!(parse_candidate_index("3", 3), None);
        assert_eq!(parse_candidate_index("-1", 3), None);
        assert_eq!(parse_candidate_index("-2", 3), None);
        assert_eq!(parse_candidate_index("maybe 1", 3), None);
        assert_eq!(parse_candidate_index("99999999999999999999999", 3), None);
    }
}
