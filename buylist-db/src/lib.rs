//! Persistence for the buy-list catalog and customer submissions.
//!
//! Everything is stored as JSON documents through the [`DocumentStore`]
//! trait, with an SQLite backend (via rusqlite with bundled feature) and an
//! in-memory backend for tests.

pub mod chunks;
pub mod error;
pub mod schema;
pub mod store;
pub mod submissions;

pub use chunks::{CHUNK_SIZE, CHUNKS_COLLECTION, CatalogChunk, ChunkStore};
pub use error::StoreError;
pub use schema::{open_database, open_memory};
pub use store::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
pub use submissions::{SUBMISSIONS_COLLECTION, SubmissionStore};
