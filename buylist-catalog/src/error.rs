use thiserror::Error;

/// Whole-input failures while reading a catalog or submission list.
///
/// Individual malformed rows are never errors; they are skipped.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// A customer submission that cannot be accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Please provide at least your Name and Email.")]
    MissingContact,

    #[error("Please list at least one card.")]
    NoCards,
}
