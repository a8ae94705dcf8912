//! Buy-list catalog ingestion.
//!
//! Turns a merchant's CSV export (any of the common column layouts) into
//! [`CatalogEntry`] values priced at the store's offer rate.

use std::path::Path;

use crate::error::IngestError;
use crate::price::buy_price;
use crate::set_parser::split_set_suffix;
use crate::table::{Row, parse_rows};
use crate::types::{CatalogEntry, Condition};

pub const NAME_HEADERS: &[&str] = &["name", "card name", "product name", "title"];
pub const SET_HEADERS: &[&str] = &["set", "set name", "expansion", "edition"];
pub const NUMBER_HEADERS: &[&str] = &["number", "card number", "set number", "#", "code"];
pub const PRICE_HEADERS: &[&str] = &["buy_price", "buy price", "market price", "price"];

/// Resolve `(name, set)` for a row, inferring the set from the name when
/// the set column is empty.
pub(crate) fn resolve_name_and_set(row: &Row) -> (String, String) {
    let name = row.first_of(NAME_HEADERS);
    let set = row.first_of(SET_HEADERS);
    if set.is_empty() && !name.is_empty() {
        if let Some(split) = split_set_suffix(name) {
            return split;
        }
    }
    (name.to_string(), set.to_string())
}

fn entry_from_row(row: &Row) -> Option<CatalogEntry> {
    let (name, set) = resolve_name_and_set(row);
    if name.trim().is_empty() {
        return None;
    }

    let condition = match row.get("condition") {
        "" => Condition::NearMint.code().to_string(),
        c => c.to_string(),
    };

    Some(CatalogEntry {
        name,
        set,
        number: row.first_of(NUMBER_HEADERS).to_string(),
        condition,
        price: buy_price(row.first_of(PRICE_HEADERS)),
    })
}

/// Parse catalog CSV text. Rows without a name are dropped.
///
/// Never fails: a file with no data rows simply yields no entries.
pub fn ingest_catalog(text: &str) -> Vec<CatalogEntry> {
    let rows = parse_rows(text);
    let total = rows.len();
    let entries: Vec<CatalogEntry> = rows.iter().filter_map(entry_from_row).collect();
    if entries.len() < total {
        log::debug!(
            "Dropped {} of {} catalog rows without a card name",
            total - entries.len(),
            total
        );
    }
    entries
}

/// Parse catalog CSV bytes, which must be UTF-8 (a BOM is allowed).
pub fn ingest_catalog_bytes(bytes: Vec<u8>) -> Result<Vec<CatalogEntry>, IngestError> {
    let text = String::from_utf8(bytes)?;
    Ok(ingest_catalog(&text))
}

/// Read and parse a catalog CSV file.
pub fn ingest_catalog_file(path: &Path) -> Result<Vec<CatalogEntry>, IngestError> {
    ingest_catalog_bytes(std::fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_passes_through_verbatim() {
        let entries = ingest_catalog("name,set,condition,price\nOnix,Base,Lightly Played,1");
        assert_eq!(entries[0].condition, "Lightly Played");
    }

    #[test]
    fn missing_condition_defaults_to_nm() {
        let entries = ingest_catalog("name,set,price\nOnix,Base,1");
        assert_eq!(entries[0].condition, "NM");
    }

    #[test]
    fn set_column_suppresses_inference() {
        let entries = ingest_catalog("name,set,price\nCharizard [Base Set],Promo,1");
        assert_eq!(entries[0].name, "Charizard [Base Set]");
        assert_eq!(entries[0].set, "Promo");
    }
}
