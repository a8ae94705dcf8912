//! Partner import file for the selected cards.

use std::path::PathBuf;

use csv::{QuoteStyle, WriterBuilder};

use buylist_catalog::SubmissionCard;

use crate::error::ExportError;

pub const EXPORT_HEADER: &str = "Product Name,Set Name,Total Quantity,Condition,TCG Player ID";

/// A rendered export, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Somewhere to deliver an export file.
pub trait ExportSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Writes exports into a directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl ExportSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(file_name), bytes)?;
        Ok(())
    }
}

/// `TCG_Seller_Export_{first_name}.csv`, with path separators and control
/// characters in the name replaced by `_`.
pub fn export_file_name(first_name: &str) -> String {
    let safe: String = first_name
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("TCG_Seller_Export_{safe}.csv")
}

/// Header row plus one fully quoted row per card.
pub fn render_offer_csv(cards: &[&SubmissionCard]) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::with_capacity(64 * (cards.len() + 1));
    out.extend_from_slice(EXPORT_HEADER.as_bytes());
    out.push(b'\n');

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);
    for card in cards {
        let quantity = card.quantity.max(1).to_string();
        wtr.write_record([
            card.name.as_str(),
            card.set.as_str(),
            quantity.as_str(),
            card.condition.label(),
            "",
        ])?;
    }
    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Export the given cards for a customer. An empty list is an error.
pub fn export_offer(
    cards: &[&SubmissionCard],
    first_name: &str,
) -> Result<OfferExport, ExportError> {
    if cards.is_empty() {
        return Err(ExportError::EmptySelection);
    }
    Ok(OfferExport {
        file_name: export_file_name(first_name),
        bytes: render_offer_csv(cards)?,
    })
}
