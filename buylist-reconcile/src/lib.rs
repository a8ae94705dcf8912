//! Buy-list reconciliation: catalog upload, submission intake, strict and
//! classifier-assisted matching, offer totals, and partner export.
//!
//! [`Buylist`] owns the store and the in-memory views; a
//! [`ReconcileSession`] holds the matching and selection state for one
//! submission.

pub mod error;
pub mod export;
pub mod fuzzy;
pub mod offer;
pub mod progress;
pub mod selection;
pub mod service;
pub mod session;
pub mod settings;

pub use error::{ExportError, ReconcileError};
pub use export::{DirectorySink, EXPORT_HEADER, ExportSink, OfferExport, export_file_name, export_offer};
pub use fuzzy::{FuzzyOptions, FuzzyOutcome, fuzzy_match};
pub use offer::{collection_vibe, draft_offer_email};
pub use progress::{ReconcileProgress, SilentProgress};
pub use selection::Selection;
pub use service::Buylist;
pub use session::{MatchDebug, ReconcileSession};
