//! Document-store abstraction and its SQLite and in-memory backends.
//!
//! Documents are JSON values addressed by `(collection, id)`. Listing order
//! is whatever the backend yields; callers that need a stable order must
//! sort explicitly.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::schema::{open_database, open_memory};

/// Minimal document store used by the chunk and submission stores.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Fetch one document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Create or overwrite a document.
    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Every `(id, document)` pair in a collection, in no guaranteed order.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;

    /// Overwrite top-level fields of an existing document.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut doc = self
            .get(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::backend(format!("{collection}/{id} is not an object")))?;
        obj.extend(fields);
        self.put(collection, id, doc).await
    }

    /// Delete every document in a collection. Returns how many were removed.
    async fn clear(&self, collection: &str) -> Result<usize, StoreError> {
        let docs = self.list(collection).await?;
        for (id, _) in &docs {
            self.delete(collection, id).await?;
        }
        Ok(docs.len())
    }
}

// ── SQLite ──────────────────────────────────────────────────────────────────

/// Document store backed by a single SQLite table.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Open (creating if needed) a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::backend(format!("{}: {e}", parent.display())))?;
            }
        }
        Ok(Self::from_connection(open_database(path)?))
    }

    /// A fresh in-memory database. Useful for testing.
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self::from_connection(open_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::backend("database connection lock poisoned"))?;
        f(&conn)
    }
}

impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.with_conn(|conn| {
            let body: Option<String> = conn
                .query_row(
                    "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| row.get(0),
                )
                .optional()?;
            body.map(|b| serde_json::from_str(&b).map_err(StoreError::from))
                .transpose()
        })
    }

    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let body = serde_json::to_string(&doc)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, body, updated_at)
                 VALUES (?1, ?2, ?3, datetime('now'))
                 ON CONFLICT(collection, id) DO UPDATE SET
                     body = excluded.body,
                     updated_at = excluded.updated_at",
                params![collection, id, body],
            )?;
            Ok(())
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )?;
            Ok(())
        })
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")?;
            let rows = stmt.query_map([collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut docs = Vec::new();
            for row in rows {
                let (id, body) = row?;
                docs.push((id, serde_json::from_str(&body)?));
            }
            Ok(docs)
        })
    }

    /// Single statement, so the collection is emptied all at once.
    async fn clear(&self, collection: &str) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM documents WHERE collection = ?1", [collection])?;
            Ok(n)
        })
    }
}

// ── In-memory ───────────────────────────────────────────────────────────────

/// Document store held entirely in memory.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::backend("memory store lock poisoned")
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        if let Some(c) = collections.get_mut(collection) {
            c.remove(id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn clear(&self, collection: &str) -> Result<usize, StoreError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        Ok(collections.remove(collection).map(|c| c.len()).unwrap_or(0))
    }
}
