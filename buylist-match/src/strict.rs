use std::collections::{BTreeMap, HashMap};

use buylist_catalog::{CatalogEntry, SubmissionCard};

use crate::normalize::{normalize_for_match, normalize_number};

/// Which fields make up a strict-match key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchKeyStrategy {
    /// Normalized name and set. Card numbers are ignored.
    #[default]
    NameSet,
    /// Name, set, and normalized collector number.
    NameSetNumber,
}

impl MatchKeyStrategy {
    /// Build the key for one (name, set, number) triple.
    pub fn key(self, name: &str, set: &str, number: &str) -> String {
        let base = format!("{}|{}", normalize_for_match(name), normalize_for_match(set));
        match self {
            Self::NameSet => base,
            Self::NameSetNumber => format!("{}|{}", base, normalize_number(number)),
        }
    }

    pub fn entry_key(self, entry: &CatalogEntry) -> String {
        self.key(&entry.name, &entry.set, &entry.number)
    }

    pub fn card_key(self, card: &SubmissionCard) -> String {
        self.key(&card.name, &card.set, &card.number)
    }
}

/// Exact-key index over a catalog.
///
/// When several entries share a key, the first one in catalog order wins.
pub struct StrictIndex {
    by_key: HashMap<String, usize>,
    strategy: MatchKeyStrategy,
}

impl StrictIndex {
    /// Index a catalog with the default name+set strategy.
    pub fn build(catalog: &[CatalogEntry]) -> Self {
        Self::with_strategy(catalog, MatchKeyStrategy::default())
    }

    pub fn with_strategy(catalog: &[CatalogEntry], strategy: MatchKeyStrategy) -> Self {
        let mut by_key = HashMap::with_capacity(catalog.len());
        for (i, entry) in catalog.iter().enumerate() {
            by_key.entry(strategy.entry_key(entry)).or_insert(i);
        }
        log::debug!(
            "Strict index: {} keys from {} catalog entries",
            by_key.len(),
            catalog.len()
        );
        Self { by_key, strategy }
    }

    pub fn strategy(&self) -> MatchKeyStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Catalog index of the strict match for a card, if any.
    pub fn lookup(&self, card: &SubmissionCard) -> Option<usize> {
        self.by_key.get(&self.strategy.card_key(card)).copied()
    }

    /// Match every card, returning submission row → catalog index.
    pub fn match_cards(&self, cards: &[SubmissionCard]) -> BTreeMap<usize, usize> {
        cards
            .iter()
            .enumerate()
            .filter_map(|(row, card)| self.lookup(card).map(|ci| (row, ci)))
            .collect()
    }
}
