//! Matching and selection state for one submission under review.

use std::collections::BTreeMap;
use std::sync::Arc;

use buylist_assistant::TextCompletion;
use buylist_catalog::{CatalogEntry, Submission, SubmissionCard};
use buylist_match::{MatchKeyStrategy, MatchResult, MatchSource, StrictIndex};

use crate::error::ReconcileError;
use crate::export::{ExportSink, OfferExport, export_offer};
use crate::fuzzy::{FuzzyOptions, FuzzyOutcome, fuzzy_match};
use crate::progress::ReconcileProgress;
use crate::selection::{Selection, offer_total, offer_total_cents};

/// Strict-match key and match source for one row, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDebug {
    pub row: usize,
    pub key: String,
    pub source: MatchSource,
}

/// A submission matched against a catalog snapshot.
///
/// Strict matches are computed on construction. Fuzzy matches are only
/// replaced by a successful [`run_fuzzy`](Self::run_fuzzy).
pub struct ReconcileSession {
    catalog: Arc<Vec<CatalogEntry>>,
    submission: Submission,
    strategy: MatchKeyStrategy,
    strict: BTreeMap<usize, usize>,
    fuzzy: BTreeMap<usize, usize>,
    selection: Selection,
}

impl ReconcileSession {
    pub fn new(catalog: Arc<Vec<CatalogEntry>>, submission: Submission) -> Self {
        Self::with_strategy(catalog, submission, MatchKeyStrategy::default())
    }

    pub fn with_strategy(
        catalog: Arc<Vec<CatalogEntry>>,
        submission: Submission,
        strategy: MatchKeyStrategy,
    ) -> Self {
        let strict = StrictIndex::with_strategy(&catalog, strategy).match_cards(&submission.cards);
        log::debug!(
            "Submission {}: {}/{} rows strictly matched",
            submission.id,
            strict.len(),
            submission.cards.len()
        );
        Self {
            catalog,
            submission,
            strategy,
            strict,
            fuzzy: BTreeMap::new(),
            selection: Selection::new(),
        }
    }

    /// Switch to a newer catalog. Strict matches are recomputed and fuzzy
    /// matches, which point into the old catalog, are dropped.
    pub fn set_catalog(&mut self, catalog: Arc<Vec<CatalogEntry>>) {
        self.strict =
            StrictIndex::with_strategy(&catalog, self.strategy).match_cards(&self.submission.cards);
        self.fuzzy.clear();
        self.catalog = catalog;
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn cards(&self) -> &[SubmissionCard] {
        &self.submission.cards
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn strategy(&self) -> MatchKeyStrategy {
        self.strategy
    }

    pub fn strict_matches(&self) -> &BTreeMap<usize, usize> {
        &self.strict
    }

    pub fn fuzzy_matches(&self) -> &BTreeMap<usize, usize> {
        &self.fuzzy
    }

    /// Match for a row, preferring the strict match over the fuzzy one.
    pub fn match_for(&self, row: usize) -> MatchResult<'_> {
        if let Some(&i) = self.strict.get(&row) {
            return MatchResult {
                source: MatchSource::Strict,
                entry: self.catalog.get(i),
            };
        }
        if let Some(&i) = self.fuzzy.get(&row) {
            return MatchResult {
                source: MatchSource::Fuzzy,
                entry: self.catalog.get(i),
            };
        }
        MatchResult::none()
    }

    /// Rows with a strict or fuzzy match, ascending.
    pub fn matched_rows(&self) -> Vec<usize> {
        (0..self.cards().len())
            .filter(|&row| self.match_for(row).is_match())
            .collect()
    }

    /// Run the classifier over rows without a strict match.
    ///
    /// On success the fuzzy matches are replaced with this run's result. On
    /// error they are left exactly as before.
    pub async fn run_fuzzy<A, P>(
        &mut self,
        assistant: &A,
        options: &FuzzyOptions,
        progress: &P,
    ) -> Result<FuzzyOutcome, ReconcileError>
    where
        A: TextCompletion,
        P: ReconcileProgress + ?Sized,
    {
        let outcome = fuzzy_match(
            assistant,
            &self.catalog,
            &self.submission.cards,
            &self.strict,
            options,
            progress,
        )
        .await?;
        self.fuzzy = outcome.matches.clone();
        Ok(outcome)
    }

    fn check_row(&self, row: usize) -> Result<(), ReconcileError> {
        let len = self.cards().len();
        if row < len {
            Ok(())
        } else {
            Err(ReconcileError::RowOutOfRange { row, len })
        }
    }

    /// Flip selection of a row. Returns whether it is now selected.
    pub fn toggle(&mut self, row: usize) -> Result<bool, ReconcileError> {
        self.check_row(row)?;
        Ok(self.selection.toggle(row))
    }

    /// Select every row that has a strict or fuzzy match.
    pub fn select_all_matches(&mut self) {
        let rows = self.matched_rows();
        self.selection.replace(rows);
    }

    /// Replace the selection with `rows`.
    pub fn select(&mut self, rows: &[usize]) -> Result<(), ReconcileError> {
        for &row in rows {
            self.check_row(row)?;
        }
        self.selection.replace(rows.iter().copied());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected cards in ascending row order.
    pub fn selected_cards(&self) -> Vec<&SubmissionCard> {
        self.selection
            .iter()
            .filter_map(|row| self.cards().get(row))
            .collect()
    }

    pub fn total_cents(&self) -> u128 {
        offer_total_cents(self.cards(), &self.selection, |row| {
            self.match_for(row).entry
        })
    }

    /// Offer total for the current selection, e.g. `"7.50"`.
    pub fn total_value(&self) -> String {
        offer_total(self.cards(), &self.selection, |row| self.match_for(row).entry)
    }

    /// Strict-match key and source for every row.
    pub fn debug_rows(&self) -> Vec<MatchDebug> {
        self.cards()
            .iter()
            .enumerate()
            .map(|(row, card)| MatchDebug {
                row,
                key: self.strategy.card_key(card),
                source: self.match_for(row).source,
            })
            .collect()
    }

    /// Render the selected cards as a partner import file.
    pub fn export(&self) -> Result<OfferExport, ReconcileError> {
        Ok(export_offer(
            &self.selected_cards(),
            &self.submission.customer.first_name,
        )?)
    }

    /// Render the selected cards and hand them to `sink`.
    pub fn export_to<K: ExportSink + ?Sized>(&self, sink: &K) -> Result<OfferExport, ReconcileError> {
        let export = self.export()?;
        sink.save(&export.file_name, &export.bytes)?;
        log::info!(
            "Exported {} cards to {}",
            self.selection.len(),
            export.file_name
        );
        Ok(export)
    }
}
