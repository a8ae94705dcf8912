/// Errors from the text-completion service and reply parsing.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by the assistant API")]
    RateLimit,

    #[error("Assistant API error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Could not parse assistant reply: {0}")]
    Reply(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AssistantError {
    pub fn reply(msg: impl Into<String>) -> Self {
        Self::Reply(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
