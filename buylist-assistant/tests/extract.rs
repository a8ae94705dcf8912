use std::sync::Mutex;

use buylist_assistant::prompts::{RAW_JSON_INSTRUCTION, SCAN_CARD_PROMPT};
use buylist_assistant::*;
use buylist_catalog::Condition;

/// Replies with a fixed string and records every request.
struct CannedAssistant {
    reply: Result<String, ()>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl CannedAssistant {
    fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl TextCompletion for CannedAssistant {
    async fn complete(&self, req: CompletionRequest) -> Result<String, AssistantError> {
        self.seen.lock().unwrap().push(req);
        self.reply
            .clone()
            .map_err(|_| AssistantError::ServerError {
                status: 503,
                message: "unavailable".to_string(),
            })
    }
}

#[tokio::test]
async fn extract_sends_parser_prompt() {
    let assistant = CannedAssistant::ok(
        "```json\n[{\"name\":\"Charizard\",\"set\":\"Base Set\",\"number\":\"4\",\"condition\":\"NM\",\"quantity\":2}]\n```",
    );
    let cards = extract_cards(&assistant, "I have 2 Charizard from Base Set")
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].quantity, 2);

    let seen = assistant.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].system_instruction, RAW_JSON_INSTRUCTION);
    assert!(seen[0].prompt.contains("I have 2 Charizard from Base Set"));
    assert!(seen[0].image_jpeg.is_none());
}

#[tokio::test]
async fn extract_rejects_prose() {
    let assistant = CannedAssistant::ok("I found a Charizard!");
    assert!(extract_cards(&assistant, "charizard").await.is_err());
}

#[tokio::test]
async fn extract_propagates_service_error() {
    let assistant = CannedAssistant::failing();
    let err = extract_cards(&assistant, "charizard").await.unwrap_err();
    assert!(matches!(err, AssistantError::ServerError { status: 503, .. }));
}

#[tokio::test]
async fn scan_sends_image() {
    let assistant = CannedAssistant::ok(
        r#"{"name":"Blastoise","set":"Base Set","number":"2/102","condition":"HP"}"#,
    );
    let card = scan_card_image(&assistant, vec![1, 2, 3]).await.unwrap();
    assert_eq!(card.name, "Blastoise");
    assert_eq!(card.condition, Condition::HeavilyPlayed);

    let seen = assistant.seen.lock().unwrap();
    assert_eq!(seen[0].prompt, SCAN_CARD_PROMPT);
    assert_eq!(seen[0].image_jpeg.as_deref(), Some(&[1u8, 2, 3][..]));
}

async fn ask<A: TextCompletion>(assistant: A) -> Result<String, AssistantError> {
    assistant.complete(CompletionRequest::new("hi")).await
}

#[tokio::test]
async fn reference_forwards() {
    let assistant = CannedAssistant::ok("ok");
    assert_eq!(ask(&assistant).await.unwrap(), "ok");
    assert_eq!(assistant.seen.lock().unwrap().len(), 1);
}
