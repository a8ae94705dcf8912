//! Structured card data from pasted text and card photos.

use serde_json::Value;

use buylist_catalog::price::parse_quantity;
use buylist_catalog::{Condition, SubmissionCard};

use crate::error::AssistantError;
use crate::prompts::{RAW_JSON_INSTRUCTION, SCAN_CARD_PROMPT, extract_cards_prompt};
use crate::reply::strip_code_fences;
use crate::{CompletionRequest, TextCompletion};

/// String value of a field; numbers are accepted and anything else is `""`.
fn field_str(obj: &Value, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn field_quantity(obj: &Value) -> u32 {
    match obj.get("quantity") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|q| u32::try_from(q).ok())
            .filter(|q| *q >= 1)
            .unwrap_or(1),
        Some(Value::String(s)) => parse_quantity(s),
        _ => 1,
    }
}

fn card_from_value(obj: &Value) -> SubmissionCard {
    SubmissionCard {
        name: field_str(obj, "name"),
        set: field_str(obj, "set"),
        number: field_str(obj, "number"),
        condition: Condition::from_code(&field_str(obj, "condition")),
        quantity: field_quantity(obj),
    }
}

/// Parse an extraction reply: a JSON array of card objects, possibly fenced.
pub fn parse_card_list(reply: &str) -> Result<Vec<SubmissionCard>, AssistantError> {
    let value: Value = serde_json::from_str(&strip_code_fences(reply))?;
    let items = value
        .as_array()
        .ok_or_else(|| AssistantError::reply("expected a JSON array of cards"))?;
    Ok(items.iter().map(card_from_value).collect())
}

/// Parse a scan reply: one JSON card object, possibly fenced.
pub fn parse_scanned_card(reply: &str) -> Result<SubmissionCard, AssistantError> {
    let value: Value = serde_json::from_str(&strip_code_fences(reply))?;
    if !value.is_object() {
        return Err(AssistantError::reply("expected a JSON object"));
    }
    let mut card = card_from_value(&value);
    card.quantity = 1;
    Ok(card)
}

/// Extract cards from a messy pasted list (email, chat message, export).
pub async fn extract_cards<A: TextCompletion>(
    assistant: &A,
    text: &str,
) -> Result<Vec<SubmissionCard>, AssistantError> {
    let reply = assistant
        .complete(
            CompletionRequest::new(extract_cards_prompt(text))
                .with_system_instruction(RAW_JSON_INSTRUCTION),
        )
        .await?;
    let cards = parse_card_list(&reply)?;
    log::info!("Extracted {} cards from pasted text", cards.len());
    Ok(cards)
}

/// Identify the card in a JPEG photo.
pub async fn scan_card_image<A: TextCompletion>(
    assistant: &A,
    jpeg: Vec<u8>,
) -> Result<SubmissionCard, AssistantError> {
    let reply = assistant
        .complete(
            CompletionRequest::new(SCAN_CARD_PROMPT)
                .with_system_instruction(RAW_JSON_INSTRUCTION)
                .with_image_jpeg(jpeg),
        )
        .await?;
    parse_scanned_card(&reply)
}
