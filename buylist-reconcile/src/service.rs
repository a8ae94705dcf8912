//! The buy-list service: owns the store plus the in-memory catalog and
//! submission views that every operator action works from.

use std::path::Path;
use std::sync::Arc;

use buylist_catalog::{
    CatalogEntry, NewSubmission, Submission, SubmissionStatus, ingest_catalog,
    ingest_catalog_bytes, ingest_catalog_file,
};
use buylist_db::{ChunkStore, DocumentStore, SubmissionStore};
use buylist_match::MatchKeyStrategy;

use crate::error::ReconcileError;
use crate::progress::ReconcileProgress;
use crate::session::ReconcileSession;

pub struct Buylist<S> {
    store: S,
    catalog: Arc<Vec<CatalogEntry>>,
    submissions: Vec<Submission>,
}

impl<S: DocumentStore> Buylist<S> {
    /// Wrap a store without reading anything from it yet.
    pub fn new(store: S) -> Self {
        Self {
            store,
            catalog: Arc::new(Vec::new()),
            submissions: Vec::new(),
        }
    }

    /// Wrap a store and load the catalog and submissions from it.
    pub async fn load(store: S) -> Result<Self, ReconcileError> {
        let mut service = Self::new(store);
        service.refresh_catalog().await?;
        service.refresh_submissions().await?;
        Ok(service)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Catalog ─────────────────────────────────────────────────────────

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Re-read the catalog from the store. Returns the entry count.
    pub async fn refresh_catalog(&mut self) -> Result<usize, ReconcileError> {
        let entries = ChunkStore::new(&self.store).read_all().await?;
        log::debug!("Loaded {} catalog entries", entries.len());
        self.catalog = Arc::new(entries);
        Ok(self.catalog.len())
    }

    /// Parse catalog CSV text and replace the stored catalog with it.
    ///
    /// Text that yields no entries is rejected before the store is touched.
    /// If the replace fails part way, the in-memory catalog is re-read so it
    /// matches whatever the store now holds.
    pub async fn upload_catalog<P>(&mut self, text: &str, progress: &P) -> Result<usize, ReconcileError>
    where
        P: ReconcileProgress + ?Sized,
    {
        progress.on_phase("Reading File...");
        let entries = ingest_catalog(text);
        self.replace_catalog(entries, progress).await
    }

    /// [`upload_catalog`](Self::upload_catalog) from raw bytes.
    pub async fn upload_catalog_bytes<P>(
        &mut self,
        bytes: Vec<u8>,
        progress: &P,
    ) -> Result<usize, ReconcileError>
    where
        P: ReconcileProgress + ?Sized,
    {
        progress.on_phase("Reading File...");
        let entries = ingest_catalog_bytes(bytes)?;
        self.replace_catalog(entries, progress).await
    }

    /// [`upload_catalog`](Self::upload_catalog) from a file.
    pub async fn upload_catalog_file<P>(
        &mut self,
        path: &Path,
        progress: &P,
    ) -> Result<usize, ReconcileError>
    where
        P: ReconcileProgress + ?Sized,
    {
        progress.on_phase("Reading File...");
        let entries = ingest_catalog_file(path)?;
        self.replace_catalog(entries, progress).await
    }

    async fn replace_catalog<P>(
        &mut self,
        entries: Vec<CatalogEntry>,
        progress: &P,
    ) -> Result<usize, ReconcileError>
    where
        P: ReconcileProgress + ?Sized,
    {
        if entries.is_empty() {
            return Err(ReconcileError::EmptyCatalog);
        }
        let count = entries.len();
        progress.on_phase(&format!("Found {} items. Clearing old data...", count));

        let chunks = ChunkStore::new(&self.store);
        let written = async {
            chunks.clear().await?;
            progress.on_phase(&format!("Uploading {} chunks...", chunks.chunk_count(count)));
            chunks.write_chunks(&entries).await
        }
        .await;

        match written {
            Ok(_) => {
                self.catalog = Arc::new(entries);
                progress.on_complete(&format!("Success! {} cards indexed.", count));
                Ok(count)
            }
            Err(e) => {
                log::warn!("Catalog upload failed: {}", e);
                match chunks.read_all().await {
                    Ok(remaining) => self.catalog = Arc::new(remaining),
                    Err(re) => {
                        log::warn!("Could not re-read catalog after failed upload: {}", re);
                        self.catalog = Arc::new(Vec::new());
                    }
                }
                Err(ReconcileError::Upload(e))
            }
        }
    }

    // ── Submissions ─────────────────────────────────────────────────────

    /// Submissions as last loaded, newest first.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn submission(&self, id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    pub async fn refresh_submissions(&mut self) -> Result<usize, ReconcileError> {
        self.submissions = SubmissionStore::new(&self.store).list().await?;
        Ok(self.submissions.len())
    }

    /// Validate and store a customer submission.
    pub async fn submit(&mut self, new: NewSubmission) -> Result<Submission, ReconcileError> {
        let submission = SubmissionStore::new(&self.store).create(new).await?;
        log::info!(
            "Received submission {} from {} ({} cards)",
            submission.id,
            submission.customer.first_name,
            submission.cards.len()
        );
        self.submissions.insert(0, submission.clone());
        Ok(submission)
    }

    /// Change a submission's status.
    ///
    /// The in-memory view changes first; if the store write fails it is
    /// restored to the previous status and the error returned.
    pub async fn set_status(
        &mut self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<(), ReconcileError> {
        let pos = self
            .submissions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ReconcileError::SubmissionNotFound(id.to_string()))?;
        let previous = std::mem::replace(&mut self.submissions[pos].status, status);

        if let Err(e) = SubmissionStore::new(&self.store)
            .update_status(id, status)
            .await
        {
            log::warn!("Status update for {} failed, reverting to {}: {}", id, previous, e);
            self.submissions[pos].status = previous;
            return Err(e.into());
        }
        Ok(())
    }

    // ── Matching ────────────────────────────────────────────────────────

    /// Start reviewing a submission against the current catalog.
    pub fn open_session(
        &self,
        id: &str,
        strategy: MatchKeyStrategy,
    ) -> Result<ReconcileSession, ReconcileError> {
        let submission = self
            .submission(id)
            .cloned()
            .ok_or_else(|| ReconcileError::SubmissionNotFound(id.to_string()))?;
        Ok(ReconcileSession::with_strategy(
            Arc::clone(&self.catalog),
            submission,
            strategy,
        ))
    }
}
