//! Offer email and collection summary drafting.
//!
//! Failures here are local to the call: they never touch matching or
//! selection state.

use buylist_assistant::prompts::{collection_vibe_prompt, offer_email_prompt, offer_line};
use buylist_assistant::{CompletionRequest, TextCompletion};
use buylist_catalog::SubmissionCard;
use buylist_catalog::price::{format_cents, price_cents};

use crate::error::ReconcileError;
use crate::session::ReconcileSession;

/// One `- {qty}x {name} ({set}): ${price}/ea` line per selected row.
pub fn offer_lines(session: &ReconcileSession) -> Vec<String> {
    session
        .selection()
        .iter()
        .filter_map(|row| {
            let card = session.cards().get(row)?;
            let unit = session
                .match_for(row)
                .entry
                .map(|e| price_cents(&e.price))
                .unwrap_or(0);
            Some(offer_line(card, &format_cents(unit)))
        })
        .collect()
}

/// Draft an offer email for the session's selected cards.
pub async fn draft_offer_email<A: TextCompletion>(
    assistant: &A,
    shop_name: &str,
    session: &ReconcileSession,
) -> Result<String, ReconcileError> {
    if session.selection().is_empty() {
        return Err(ReconcileError::NothingSelected);
    }
    let prompt = offer_email_prompt(
        shop_name,
        &session.submission().customer.first_name,
        &offer_lines(session),
        &session.total_value(),
    );
    Ok(assistant.complete(CompletionRequest::new(prompt)).await?)
}

/// Two-sentence character sketch of a customer's list.
pub async fn collection_vibe<A: TextCompletion>(
    assistant: &A,
    cards: &[SubmissionCard],
) -> Result<String, ReconcileError> {
    Ok(assistant
        .complete(CompletionRequest::new(collection_vibe_prompt(cards)))
        .await?)
}
