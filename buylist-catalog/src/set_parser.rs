//! Infer a set name embedded in a product name.
//!
//! Buy-list exports without a set column usually fold the set into the name:
//!
//! - `Charizard [Base Set]`
//! - `Charizard (Base Set)`
//! - `Charizard - Base Set`
//!
//! The forms are tried in that order and the first that fits wins.

/// Split off a trailing `<ws><open>...<close>` group.
///
/// The split point is the *last* whitespace-then-`open` pair, so
/// `Pikachu [Promo] [Black Star]` yields `Black Star`.
fn split_enclosed(name: &str, open: char, close: char) -> Option<(&str, &str)> {
    let body = name.strip_suffix(close)?;
    let mut best = None;
    let mut prev_ws: Option<usize> = None;
    for (i, c) in body.char_indices() {
        if let Some(ws) = prev_ws.filter(|_| c == open) {
            best = Some((ws, i));
        }
        prev_ws = if c.is_whitespace() { Some(i) } else { None };
    }
    let (ws, open_at) = best?;
    let inner = &body[open_at + open.len_utf8()..];
    Some((&name[..ws], inner))
}

/// Split `name` into `(name, set)` when it carries a recognizable set suffix.
///
/// Both halves are trimmed. Returns `None` when no form applies.
///
/// ```
/// use buylist_catalog::set_parser::split_set_suffix;
///
/// assert_eq!(
///     split_set_suffix("Blastoise [Base Set]"),
///     Some(("Blastoise".to_string(), "Base Set".to_string()))
/// );
/// assert_eq!(
///     split_set_suffix("Dark Blastoise - Team Rocket"),
///     Some(("Dark Blastoise".to_string(), "Team Rocket".to_string()))
/// );
/// assert_eq!(split_set_suffix("Mewtwo"), None);
/// ```
pub fn split_set_suffix(name: &str) -> Option<(String, String)> {
    if let Some((n, s)) = split_enclosed(name, '[', ']') {
        return Some((n.trim().to_string(), s.trim().to_string()));
    }
    if let Some((n, s)) = split_enclosed(name, '(', ')') {
        return Some((n.trim().to_string(), s.trim().to_string()));
    }
    let (n, s) = name.rsplit_once(" - ")?;
    Some((n.trim().to_string(), s.trim().to_string()))
}
