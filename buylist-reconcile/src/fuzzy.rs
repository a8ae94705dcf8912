//! Classifier-assisted matching for rows the strict matcher missed.
//!
//! Each unmatched row is narrowed to a short candidate list and the
//! classifier is asked to pick one (or `-1`). Replies that are not a valid
//! candidate index mean "no match". A transport or service error aborts the
//! whole run and nothing from it is kept.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};

use buylist_assistant::prompts::{CLASSIFY_INSTRUCTION, classify_prompt};
use buylist_assistant::{AssistantError, CompletionRequest, TextCompletion, parse_candidate_index};
use buylist_catalog::{CatalogEntry, SubmissionCard};
use buylist_match::{CandidateIndex, DEFAULT_CANDIDATE_LIMIT};

use crate::progress::ReconcileProgress;

/// Options controlling a fuzzy matching run.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyOptions {
    /// Classifier calls allowed in flight at once.
    pub max_in_flight: usize,
    /// Candidates offered to the classifier per row.
    pub candidate_limit: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 1,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuzzyOutcome {
    /// Row index -> catalog index.
    pub matches: BTreeMap<usize, usize>,
    /// Rows that were not strictly matched.
    pub considered: usize,
    /// Rows with no candidates, so the classifier was never asked.
    pub skipped: usize,
}

impl FuzzyOutcome {
    /// Operator-facing summary line.
    pub fn message(&self) -> String {
        if self.considered == 0 {
            "All cards already strictly matched!".to_string()
        } else if self.matches.is_empty() {
            "AI finished scan but found no confident matches for remaining cards.".to_string()
        } else {
            format!("AI found {} possible matches!", self.matches.len())
        }
    }
}

/// Ask the classifier which candidate (if any) is the row's card.
async fn classify_row<A: TextCompletion>(
    assistant: &A,
    catalog: &[CatalogEntry],
    card: &SubmissionCard,
    candidates: &[usize],
) -> Result<Option<usize>, AssistantError> {
    if candidates.is_empty() {
        return Ok(None);
    }
    let entries: Vec<&CatalogEntry> = candidates.iter().map(|&i| &catalog[i]).collect();
    let reply = assistant
        .complete(
            CompletionRequest::new(classify_prompt(card, &entries))
                .with_system_instruction(CLASSIFY_INSTRUCTION),
        )
        .await?;
    let picked = parse_candidate_index(&reply, candidates.len()).map(|k| candidates[k]);
    if picked.is_none() {
        log::debug!("No confident match for '{}' (reply: {:?})", card.name, reply.trim());
    }
    Ok(picked)
}

/// Classify every row of `cards` not present in `strict`.
///
/// Returns the fuzzy matches found. On the first assistant error the
/// remaining calls are dropped and the error is returned.
pub async fn fuzzy_match<A, P>(
    assistant: &A,
    catalog: &[CatalogEntry],
    cards: &[SubmissionCard],
    strict: &BTreeMap<usize, usize>,
    options: &FuzzyOptions,
    progress: &P,
) -> Result<FuzzyOutcome, AssistantError>
where
    A: TextCompletion,
    P: ReconcileProgress + ?Sized,
{
    let index = CandidateIndex::build(catalog);
    let pending: Vec<(usize, Vec<usize>)> = cards
        .iter()
        .enumerate()
        .filter(|(row, _)| !strict.contains_key(row))
        .map(|(row, card)| (row, index.candidates(card, options.candidate_limit)))
        .collect();

    let total = pending.len();
    let skipped = pending.iter().filter(|(_, c)| c.is_empty()).count();
    if total > 0 {
        progress.on_phase(&format!("Asking AI about {} unmatched cards...", total));
    }

    let mut results = stream::iter(pending.into_iter().map(move |(row, candidates)| async move {
        let picked = classify_row(assistant, catalog, &cards[row], &candidates).await?;
        Ok::<_, AssistantError>((row, picked))
    }))
    .buffer_unordered(options.max_in_flight.max(1));

    let mut matches = BTreeMap::new();
    let mut done = 0;
    while let Some(result) = results.next().await {
        let (row, picked) = result?;
        done += 1;
        progress.on_item(done, total, &cards[row].name);
        if let Some(entry) = picked {
            matches.insert(row, entry);
        }
    }

    let outcome = FuzzyOutcome {
        matches,
        considered: total,
        skipped,
    };
    progress.on_complete(&outcome.message());
    Ok(outcome)
}
