//! Buy-list data model and CSV ingestion.
//!
//! Provides the catalog and submission types shared by every other crate,
//! the CSV catalog ingestor, and customer list intake.

pub mod error;
pub mod ingest;
pub mod price;
pub mod set_parser;
pub mod submission;
pub mod table;
pub mod types;

pub use error::{IngestError, SubmissionError};
pub use ingest::{ingest_catalog, ingest_catalog_bytes, ingest_catalog_file};
pub use submission::{NewSubmission, parse_submission_csv, parse_submission_file};
pub use types::*;
