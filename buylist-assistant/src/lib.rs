//! Natural-language assistant used for fuzzy matching, list extraction,
//! card scanning, and offer drafting.
//!
//! All calls go through the [`TextCompletion`] trait so callers can swap the
//! HTTP client for a deterministic stub.

pub mod client;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod reply;

pub use client::GeminiClient;
pub use credentials::{
    CredentialSource, CredentialSources, Credentials, DEFAULT_MODEL, config_path,
    credential_sources, save_to_file,
};
pub use error::AssistantError;
pub use extract::{extract_cards, scan_card_image};
pub use reply::{parse_candidate_index, strip_code_fences};

/// One request to a text-completion service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Empty when the task has no special instruction.
    pub system_instruction: String,
    /// Optional JPEG image sent alongside the prompt.
    pub image_jpeg: Option<Vec<u8>>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_image_jpeg(mut self, jpeg: Vec<u8>) -> Self {
        self.image_jpeg = Some(jpeg);
        self
    }
}

/// A service that turns a prompt into reply text.
#[allow(async_fn_in_trait)]
pub trait TextCompletion {
    async fn complete(&self, req: CompletionRequest) -> Result<String, AssistantError>;
}

impl<T: TextCompletion> TextCompletion for &T {
    async fn complete(&self, req: CompletionRequest) -> Result<String, AssistantError> {
        (**self).complete(req).await
    }
}
