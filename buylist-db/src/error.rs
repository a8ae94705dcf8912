use buylist_catalog::SubmissionError;
use thiserror::Error;

use crate::schema::SchemaError;

/// Errors from the document store and the stores built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("{0}")]
    Invalid(#[from] SubmissionError),

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
