use buylist_assistant::AssistantError;
use buylist_catalog::IngestError;
use buylist_db::StoreError;
use thiserror::Error;

/// Errors from producing an offer export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please select matches to export.")]
    EmptySelection,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the reconciliation service.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("{0}")]
    Ingest(#[from] IngestError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("No valid data found in CSV.")]
    EmptyCatalog,

    #[error("Error uploading Buy List: {0}")]
    Upload(StoreError),

    #[error("Please select cards to generate an offer for.")]
    NothingSelected,

    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("Row {row} is out of range (submission has {len} cards)")]
    RowOutOfRange { row: usize, len: usize },
}
