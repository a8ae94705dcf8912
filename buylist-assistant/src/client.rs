use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::credentials::Credentials;
use crate::error::AssistantError;
use crate::{CompletionRequest, TextCompletion};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    Inline {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ReplyContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, or `""`.
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default()
    }
}

/// At most the first 200 bytes of a response body, cut on a char boundary.
fn excerpt(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn build_body(req: &CompletionRequest) -> GenerateRequest<'_> {
    let mut parts = vec![Part::Text { text: &req.prompt }];
    if let Some(ref image) = req.image_jpeg {
        parts.push(Part::Inline {
            inline_data: InlineData {
                mime_type: "image/jpeg",
                data: STANDARD.encode(image),
            },
        });
    }
    GenerateRequest {
        contents: vec![Content { parts }],
        system_instruction: Content {
            parts: vec![Part::Text {
                text: &req.system_instruction,
            }],
        },
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// HTTP client for the Gemini `generateContent` API with rate limiting.
pub struct GeminiClient {
    http: reqwest::Client,
    creds: Credentials,
    base_url: String,
    last_request: Arc<Mutex<Instant>>,
}

impl GeminiClient {
    pub fn new(creds: Credentials) -> Result<Self, AssistantError> {
        if creds.api_key.trim().is_empty() {
            return Err(AssistantError::config("Gemini API key is empty"));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            creds,
            base_url: BASE_URL.to_string(),
            last_request: Arc::new(Mutex::new(Instant::now() - MIN_REQUEST_INTERVAL)),
        })
    }

    /// Point the client at a different API root (e.g., a local proxy).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.creds.model
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < MIN_REQUEST_INTERVAL {
            tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
        }
        *last = Instant::now();
    }
}

impl TextCompletion for GeminiClient {
    async fn complete(&self, req: CompletionRequest) -> Result<String, AssistantError> {
        let body = build_body(&req);

        self.rate_limit().await;

        let resp = self
            .http
            .post(format!("{}/{}:generateContent", self.base_url, self.creds.model))
            .header("x-goog-api-key", &self.creds.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AssistantError::RateLimit);
        }
        if !status.is_success() {
            return Err(AssistantError::ServerError {
                status: status.as_u16(),
                message: excerpt(&text).to_string(),
            });
        }

        let response: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            AssistantError::reply(format!(
                "Failed to parse response: {e}. Response: {}",
                excerpt(&text)
            ))
        })?;

        let reply = response.first_text();
        log::debug!("Assistant replied with {} bytes", reply.len());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_layout_text_only() {
        let req = CompletionRequest::new("hello").with_system_instruction("be brief");
        let v = serde_json::to_value(build_body(&req)).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(v["systemInstruction"]["parts"][0]["text"], "be brief");
        assert_eq!(v["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn body_layout_with_image() {
        let req = CompletionRequest::new("look").with_image_jpeg(vec![0xff, 0xd8, 0xff]);
        let v = serde_json::to_value(build_body(&req)).unwrap();
        let inline = &v["contents"][0]["parts"][1]["inlineData"];
        assert_eq!(inline["mimeType"], "image/jpeg");
        assert_eq!(inline["data"], "/9j/");
    }

    #[test]
    fn reply_text_extraction() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"3"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_text(), "3");
    }

    #[test]
    fn empty_reply_is_empty_text() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(resp.first_text(), "");
        let resp: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.first_text(), "");
    }

    #[test]
    fn excerpt_respects_char_boundaries() {
        let s = "é".repeat(150);
        assert_eq!(excerpt(&s).len(), 200);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            GeminiClient::new(Credentials::new(" ")),
            Err(AssistantError::Config(_))
        ));
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let client = GeminiClient::new(Credentials::new("key"))
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/v1beta/models/");
        assert_eq!(client.base_url, "http://127.0.0.1:8080/v1beta/models");
        assert_eq!(client.model(), crate::DEFAULT_MODEL);
    }
}
