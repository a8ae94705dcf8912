use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use buylist_catalog::*;
use buylist_db::{
    CHUNKS_COLLECTION, ChunkStore, DocumentStore, MemoryDocumentStore, SUBMISSIONS_COLLECTION,
    SqliteDocumentStore, StoreError, SubmissionStore,
};
use buylist_match::{MatchKeyStrategy, MatchSource};
use buylist_reconcile::{Buylist, ReconcileError, ReconcileProgress, SilentProgress};

const CATALOG_CSV: &str = "Name,Set,Number,Condition,Price\n\
                           Charizard,Base Set,4,NM,40.00\n\
                           Blastoise,Base Set,2,NM,30.00\n";

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ReconcileProgress for Recorder {
    fn on_item(&self, _current: usize, _total: usize, _name: &str) {}

    fn on_phase(&self, message: &str) {
        self.events.lock().unwrap().push(message.to_string());
    }

    fn on_complete(&self, message: &str) {
        self.events.lock().unwrap().push(message.to_string());
    }
}

/// Memory store that can be told to reject writes to one collection or id.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryDocumentStore,
    reject_collection: Option<&'static str>,
    reject_id: Option<&'static str>,
    armed: AtomicBool,
}

impl FlakyStore {
    fn rejecting(collection: &'static str, id: Option<&'static str>) -> Self {
        Self {
            reject_collection: Some(collection),
            reject_id: id,
            ..Default::default()
        }
    }

    fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    fn rejects(&self, collection: &str, id: &str) -> bool {
        self.armed.load(Ordering::SeqCst)
            && self.reject_collection == Some(collection)
            && self.reject_id.is_none_or(|r| r == id)
    }
}

impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        if self.rejects(collection, id) {
            return Err(StoreError::backend("write rejected"));
        }
        self.inner.put(collection, id, doc).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        self.inner.list(collection).await
    }
}

fn ash() -> Customer {
    Customer {
        first_name: "Ash".to_string(),
        email: "ash@example.com".to_string(),
        phone: String::new(),
    }
}

fn large_csv(rows: usize) -> String {
    let mut csv = String::from("name,set,price\n");
    for i in 0..rows {
        csv.push_str(&format!("Card {i},Set {},4.00\n", i % 7));
    }
    csv
}

#[tokio::test]
async fn upload_submit_match_select() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    let count = buylist
        .upload_catalog(CATALOG_CSV, &SilentProgress)
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(buylist.catalog()[0].price, "30.00");
    assert_eq!(buylist.catalog()[1].price, "22.50");

    let submission = buylist
        .submit(NewSubmission::new(ash()).with_cards([SubmissionCard::new("charizard", "base set")]))
        .await
        .unwrap();

    let mut session = buylist
        .open_session(&submission.id, MatchKeyStrategy::default())
        .unwrap();
    let matched = session.match_for(0);
    assert_eq!(matched.source, MatchSource::Strict);
    assert_eq!(matched.entry.unwrap().price, "30.00");

    session.select_all_matches();
    assert_eq!(session.total_value(), "30.00");
}

#[tokio::test]
async fn upload_reports_each_phase() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    let progress = Recorder::default();
    buylist
        .upload_catalog(&large_csv(4500), &progress)
        .await
        .unwrap();
    assert_eq!(
        *progress.events.lock().unwrap(),
        vec![
            "Reading File...".to_string(),
            "Found 4500 items. Clearing old data...".to_string(),
            "Uploading 3 chunks...".to_string(),
            "Success! 4500 cards indexed.".to_string(),
        ]
    );
    assert_eq!(buylist.catalog().len(), 4500);
    assert_eq!(buylist.catalog()[4499].name, "Card 4499");
}

#[tokio::test]
async fn empty_upload_leaves_store_alone() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    buylist.upload_catalog(CATALOG_CSV, &SilentProgress).await.unwrap();

    let err = buylist
        .upload_catalog("name,set,price\n,,\n", &SilentProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::EmptyCatalog));
    assert_eq!(err.to_string(), "No valid data found in CSV.");

    assert_eq!(buylist.catalog().len(), 2);
    assert_eq!(buylist.refresh_catalog().await.unwrap(), 2);
}

#[tokio::test]
async fn failed_upload_rereads_partial_state() {
    let store = FlakyStore::rejecting(CHUNKS_COLLECTION, Some("chunk_1"));
    let mut buylist = Buylist::new(store);
    buylist.upload_catalog(CATALOG_CSV, &SilentProgress).await.unwrap();

    buylist.store().arm();
    let err = buylist
        .upload_catalog(&large_csv(4500), &SilentProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Upload(StoreError::Backend(_))));
    assert!(err.to_string().starts_with("Error uploading Buy List:"));

    let stored = ChunkStore::new(buylist.store()).read_all().await.unwrap();
    assert_eq!(buylist.catalog(), stored.as_slice());
    assert!(buylist.catalog().len() < 4500);
    assert!(buylist.catalog().iter().all(|e| e.name != "Charizard"));
}

#[tokio::test]
async fn load_reads_catalog_and_submissions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buylist.db");
    {
        let mut buylist = Buylist::new(SqliteDocumentStore::open(&path).unwrap());
        buylist.upload_catalog(CATALOG_CSV, &SilentProgress).await.unwrap();
        buylist
            .submit(NewSubmission::new(ash()).with_cards([SubmissionCard::new("Mew", "Promo")]))
            .await
            .unwrap();
    }

    let buylist = Buylist::load(SqliteDocumentStore::open(&path).unwrap())
        .await
        .unwrap();
    assert_eq!(buylist.catalog().len(), 2);
    assert_eq!(buylist.submissions().len(), 1);
    assert_eq!(buylist.submissions()[0].cards[0].name, "Mew");
}

#[tokio::test]
async fn invalid_submission_is_rejected() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    let mut customer = ash();
    customer.email = "  ".into();
    let err = buylist
        .submit(NewSubmission::new(customer).with_cards([SubmissionCard::new("Mew", "Promo")]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please provide at least your Name and Email.");

    let err = buylist
        .submit(NewSubmission::new(ash()).with_cards([SubmissionCard::new(" ", "")]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please list at least one card.");
    assert!(buylist.submissions().is_empty());
}

#[tokio::test]
async fn status_change_is_persisted() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    let sub = buylist
        .submit(NewSubmission::new(ash()).with_cards([SubmissionCard::new("Mew", "Promo")]))
        .await
        .unwrap();

    buylist
        .set_status(&sub.id, SubmissionStatus::Finalized)
        .await
        .unwrap();
    assert_eq!(
        buylist.submission(&sub.id).unwrap().status,
        SubmissionStatus::Finalized
    );
    let stored = SubmissionStore::new(buylist.store())
        .get(&sub.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubmissionStatus::Finalized);

    // Any order is allowed.
    buylist
        .set_status(&sub.id, SubmissionStatus::Pending)
        .await
        .unwrap();
}

#[tokio::test]
async fn failed_status_write_rolls_back() {
    let store = FlakyStore::rejecting(SUBMISSIONS_COLLECTION, None);
    let mut buylist = Buylist::new(store);
    let sub = buylist
        .submit(NewSubmission::new(ash()).with_cards([SubmissionCard::new("Mew", "Promo")]))
        .await
        .unwrap();

    buylist.store().arm();
    let err = buylist
        .set_status(&sub.id, SubmissionStatus::Contacted)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Store(StoreError::Backend(_))));
    assert_eq!(
        buylist.submission(&sub.id).unwrap().status,
        SubmissionStatus::Pending
    );
}

#[tokio::test]
async fn unknown_submission() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    assert!(matches!(
        buylist.set_status("nope", SubmissionStatus::Contacted).await,
        Err(ReconcileError::SubmissionNotFound(_))
    ));
    assert!(matches!(
        buylist.open_session("nope", MatchKeyStrategy::default()),
        Err(ReconcileError::SubmissionNotFound(_))
    ));
}

#[tokio::test]
async fn number_aware_sessions_compare_collector_numbers() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    buylist.upload_catalog(CATALOG_CSV, &SilentProgress).await.unwrap();
    let sub = buylist
        .submit(NewSubmission::new(ash()).with_cards([
            SubmissionCard::new("Charizard", "Base Set").with_number("004/102"),
            SubmissionCard::new("Blastoise", "Base Set").with_number("9/102"),
        ]))
        .await
        .unwrap();

    let plain = buylist
        .open_session(&sub.id, MatchKeyStrategy::NameSet)
        .unwrap();
    assert_eq!(plain.strict_matches().len(), 2);

    let numbered = buylist
        .open_session(&sub.id, MatchKeyStrategy::NameSetNumber)
        .unwrap();
    assert_eq!(numbered.match_for(0).source, MatchSource::Strict);
    assert_eq!(numbered.match_for(1).source, MatchSource::None);
}

#[tokio::test]
async fn undecodable_upload_is_rejected() {
    let mut buylist = Buylist::new(MemoryDocumentStore::new());
    buylist.upload_catalog(CATALOG_CSV, &SilentProgress).await.unwrap();

    let err = buylist
        .upload_catalog_bytes(vec![b'n', b'a', 0xff, 0xfe, b'\n'], &SilentProgress)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Ingest(IngestError::Decode(_))));
    assert_eq!(buylist.catalog().len(), 2);

    let bytes = CATALOG_CSV.as_bytes().to_vec();
    assert_eq!(
        buylist.upload_catalog_bytes(bytes, &SilentProgress).await.unwrap(),
        2
    );
}
