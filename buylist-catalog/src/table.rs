//! Loose CSV reading shared by catalog and submission imports.
//!
//! Spreadsheet exports are inconsistent about line endings, quoting, and
//! column names, so rows are read one physical line at a time and exposed as
//! header-keyed maps. Malformed lines never fail the parse.

use std::collections::HashMap;

/// One data row keyed by normalized (trimmed, lowercased, unquoted) header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Value for a header, or `""` when the column is absent.
    pub fn get(&self, header: &str) -> &str {
        self.fields.get(header).map(String::as_str).unwrap_or("")
    }

    /// First non-empty value among a list of header aliases.
    pub fn first_of(&self, aliases: &[&str]) -> &str {
        aliases
            .iter()
            .map(|h| self.get(h))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(String::is_empty)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Split text into non-blank physical lines, dropping a leading BOM.
///
/// `\r\n`, `\n`, and a lone `\r` all end a line.
pub fn physical_lines(text: &str) -> Vec<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (line, next) = match rest.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                (&rest[..pos], &rest[pos + skip..])
            }
            None => (rest, ""),
        };
        if !line.trim().is_empty() {
            lines.push(line);
        }
        rest = next;
    }
    lines
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace('"', "")
}

/// Strip one leading and one trailing quote if present.
fn unquote(v: &str) -> &str {
    let v = v.strip_prefix('"').unwrap_or(v);
    v.strip_suffix('"').unwrap_or(v)
}

/// Split one data line on commas outside quoted spans, then trim and unquote
/// each field.
///
/// A comma separates fields when an even number of quotes follows it on the
/// line, so a quoted span is protected wherever it starts in a field.
fn split_fields(line: &str) -> Vec<String> {
    let total = line.matches('"').count();
    let mut fields = Vec::new();
    let mut start = 0;
    let mut seen = 0;
    for (i, c) in line.char_indices() {
        match c {
            '"' => seen += 1,
            ',' if (total - seen) % 2 == 0 => {
                fields.push(unquote(line[start..i].trim()).to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(unquote(line[start..].trim()).to_string());
    fields
}

/// Parse CSV text into header-keyed rows.
///
/// Fewer than two non-blank lines (no header plus data) yields no rows.
/// Header cells are split on every comma; data cells respect quotes.
/// Cells beyond the header count are ignored and missing cells read as `""`.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let lines = physical_lines(text);
    if lines.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = lines[0].split(',').map(normalize_header).collect();

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for (i, line) in lines[1..].iter().enumerate() {
        if line.matches('"').count() % 2 == 1 {
            log::debug!("Unbalanced quotes on CSV line {}", i + 2);
        }
        let values = split_fields(line);
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(col, h)| (h.clone(), values.get(col).cloned().unwrap_or_default()))
            .collect();
        rows.push(row);
    }
    rows
}
