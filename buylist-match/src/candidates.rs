//! Local candidate narrowing for rows without a strict match.
//!
//! This is a cheap, deliberately loose filter; final judgement on whether a
//! candidate is the same card is left to the classifier.

use buylist_catalog::{CatalogEntry, SubmissionCard};

use crate::normalize::normalize_for_match;

/// Maximum number of candidates forwarded for one row.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 15;

/// Catalog with names and sets pre-normalized for repeated scanning.
pub struct CandidateIndex {
    names: Vec<String>,
    sets: Vec<String>,
}

impl CandidateIndex {
    pub fn build(catalog: &[CatalogEntry]) -> Self {
        let (names, sets) = catalog
            .iter()
            .map(|e| (normalize_for_match(&e.name), normalize_for_match(&e.set)))
            .unzip();
        Self { names, sets }
    }

    /// Catalog indices that plausibly refer to `card`, in catalog order.
    ///
    /// An entry qualifies when its normalized name equals the card's, its
    /// normalized set equals the card's, or either name contains the other.
    /// A card whose name normalizes to nothing is contained in every name,
    /// so it qualifies against the whole catalog (up to `limit`).
    pub fn candidates(&self, card: &SubmissionCard, limit: usize) -> Vec<usize> {
        let card_name = normalize_for_match(&card.name);
        let card_set = normalize_for_match(&card.set);

        self.names
            .iter()
            .zip(&self.sets)
            .enumerate()
            .filter(|(_, (name, set))| {
                **name == card_name
                    || **set == card_set
                    || name.contains(card_name.as_str())
                    || card_name.contains(name.as_str())
            })
            .map(|(i, _)| i)
            .take(limit)
            .collect()
    }
}
