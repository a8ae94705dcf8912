//! Customer submission persistence.

use chrono::Utc;
use serde_json::{Map, Value};

use buylist_catalog::{NewSubmission, Submission, SubmissionStatus};

use crate::error::StoreError;
use crate::store::DocumentStore;

pub const SUBMISSIONS_COLLECTION: &str = "submissions";

pub struct SubmissionStore<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> SubmissionStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate and store a new submission with status `pending`.
    pub async fn create(&self, new: NewSubmission) -> Result<Submission, StoreError> {
        let (customer, cards) = new.validate()?;
        let submission = Submission {
            id: uuid::Uuid::new_v4().to_string(),
            customer,
            cards,
            status: SubmissionStatus::Pending,
            submitted_at: Utc::now(),
        };
        let doc = serde_json::to_value(&submission)?;
        self.store
            .put(SUBMISSIONS_COLLECTION, &submission.id, doc)
            .await?;
        log::debug!(
            "Stored submission {} ({} cards)",
            submission.id,
            submission.cards.len()
        );
        Ok(submission)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Submission>, StoreError> {
        match self.store.get(SUBMISSIONS_COLLECTION, id).await? {
            Some(doc) => Ok(Some(from_doc(id, doc)?)),
            None => Ok(None),
        }
    }

    /// All submissions, newest first.
    pub async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        let mut subs = Vec::new();
        for (id, doc) in self.store.list(SUBMISSIONS_COLLECTION).await? {
            subs.push(from_doc(&id, doc)?);
        }
        subs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(subs)
    }

    /// Persist a new status. Fails with `NotFound` for an unknown id.
    pub async fn update_status(&self, id: &str, status: SubmissionStatus) -> Result<(), StoreError> {
        let mut fields = Map::new();
        fields.insert("status".to_string(), Value::from(status.as_str()));
        self.store.update(SUBMISSIONS_COLLECTION, id, fields).await
    }
}

/// Decode a stored submission; the document id is authoritative.
fn from_doc(id: &str, doc: Value) -> Result<Submission, StoreError> {
    let mut submission: Submission = serde_json::from_value(doc)?;
    submission.id = id.to_string();
    Ok(submission)
}
