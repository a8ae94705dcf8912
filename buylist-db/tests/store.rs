use buylist_db::*;
use serde_json::{Map, Value, json};

async fn exercise_store<S: DocumentStore>(store: &S) {
    assert!(store.get("things", "a").await.unwrap().is_none());

    store.put("things", "a", json!({"n": 1})).await.unwrap();
    store.put("things", "b", json!({"n": 2})).await.unwrap();
    store.put("other", "a", json!({"n": 3})).await.unwrap();

    assert_eq!(store.get("things", "a").await.unwrap(), Some(json!({"n": 1})));

    store.put("things", "a", json!({"n": 10})).await.unwrap();
    assert_eq!(store.get("things", "a").await.unwrap(), Some(json!({"n": 10})));

    let mut ids: Vec<String> = store
        .list("things")
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["a", "b"]);

    store.delete("things", "b").await.unwrap();
    store.delete("things", "missing").await.unwrap();
    assert_eq!(store.list("things").await.unwrap().len(), 1);

    let mut fields = Map::new();
    fields.insert("status".into(), Value::from("done"));
    store.update("things", "a", fields.clone()).await.unwrap();
    assert_eq!(
        store.get("things", "a").await.unwrap(),
        Some(json!({"n": 10, "status": "done"}))
    );
    let err = store.update("things", "nope", fields).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));

    assert_eq!(store.clear("things").await.unwrap(), 1);
    assert!(store.list("things").await.unwrap().is_empty());
    assert_eq!(store.list("other").await.unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_store_roundtrip() {
    let store = SqliteDocumentStore::in_memory().unwrap();
    exercise_store(&store).await;
}

#[tokio::test]
async fn memory_store_roundtrip() {
    let store = MemoryDocumentStore::new();
    exercise_store(&store).await;
}

#[tokio::test]
async fn sqlite_store_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("buylist.db");
    {
        let store = SqliteDocumentStore::open(&path).unwrap();
        store.put("c", "x", json!([1, 2, 3])).await.unwrap();
    }
    let store = SqliteDocumentStore::open(&path).unwrap();
    assert_eq!(store.get("c", "x").await.unwrap(), Some(json!([1, 2, 3])));
}
