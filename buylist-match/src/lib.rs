//! Matching customer cards against the buy-list catalog.
//!
//! Strict matching compares normalized (name, set) keys exactly. Rows left
//! unmatched can be narrowed to a short list of candidates for a classifier.

pub mod candidates;
pub mod normalize;
pub mod strict;

pub use candidates::{CandidateIndex, DEFAULT_CANDIDATE_LIMIT};
pub use normalize::{normalize_for_match, normalize_number};
pub use strict::{MatchKeyStrategy, StrictIndex};

use buylist_catalog::CatalogEntry;

/// How a submission row was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSource {
    /// Exact normalized key match
    Strict,
    /// Candidate picked by the classifier
    Fuzzy,
    /// No match
    None,
}

impl MatchSource {
    /// Short tag used in debug listings.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Strict => "STRICT",
            Self::Fuzzy => "AI",
            Self::None => "NONE",
        }
    }
}

/// Match outcome for one submission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub source: MatchSource,
    pub entry: Option<&'a CatalogEntry>,
}

impl MatchResult<'_> {
    pub fn none() -> Self {
        Self {
            source: MatchSource::None,
            entry: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }
}
