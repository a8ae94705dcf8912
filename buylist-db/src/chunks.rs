//! Chunked catalog persistence.
//!
//! A catalog can hold tens of thousands of entries, more than fits in one
//! document, so it is stored as `chunk_0 .. chunk_{N-1}` documents of at most
//! [`CHUNK_SIZE`] entries each. Concatenating the chunks in ascending index
//! order reproduces the catalog.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use buylist_catalog::CatalogEntry;

use crate::error::StoreError;
use crate::store::DocumentStore;

pub const CHUNKS_COLLECTION: &str = "buylist_chunks";
pub const CHUNK_SIZE: usize = 2000;

/// One persisted slice of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogChunk {
    pub index: usize,
    pub count: usize,
    pub data: Vec<CatalogEntry>,
    pub updated_at: DateTime<Utc>,
}

/// Document id for a chunk index.
pub fn chunk_id(index: usize) -> String {
    format!("chunk_{index}")
}

/// Split entries into chunks of at most `size`, preserving order.
pub fn split_into_chunks(entries: &[CatalogEntry], size: usize) -> Vec<CatalogChunk> {
    let now = Utc::now();
    entries
        .chunks(size.max(1))
        .enumerate()
        .map(|(index, data)| CatalogChunk {
            index,
            count: data.len(),
            data: data.to_vec(),
            updated_at: now,
        })
        .collect()
}

/// Reads and replaces the catalog held in a document store.
pub struct ChunkStore<'a, S> {
    store: &'a S,
    chunk_size: usize,
}

impl<'a, S: DocumentStore> ChunkStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            chunk_size: CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Number of chunks `len` entries will occupy.
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Delete every stored chunk. Returns how many were removed.
    pub async fn clear(&self) -> Result<usize, StoreError> {
        let removed = self.store.clear(CHUNKS_COLLECTION).await?;
        log::debug!("Removed {} catalog chunks", removed);
        Ok(removed)
    }

    /// Write `entries` as chunks `0..N`. All writes are issued together and
    /// the call fails if any of them fails.
    ///
    /// Existing chunks are not touched; call [`clear`](Self::clear) first.
    pub async fn write_chunks(&self, entries: &[CatalogEntry]) -> Result<usize, StoreError> {
        let chunks = split_into_chunks(entries, self.chunk_size);
        let count = chunks.len();

        let writes = chunks
            .into_iter()
            .map(|chunk| async move {
                let id = chunk_id(chunk.index);
                let doc = serde_json::to_value(&chunk)?;
                self.store.put(CHUNKS_COLLECTION, &id, doc).await
            })
            .collect::<Vec<_>>();
        try_join_all(writes).await?;

        log::debug!("Wrote {} entries in {} chunks", entries.len(), count);
        Ok(count)
    }

    /// Replace the stored catalog with `entries`.
    ///
    /// The old chunks are deleted before any new chunk is written. If a
    /// write fails the store is left partially filled and the whole replace
    /// should be retried.
    pub async fn replace_all(&self, entries: &[CatalogEntry]) -> Result<usize, StoreError> {
        self.clear().await?;
        self.write_chunks(entries).await
    }

    /// Load every chunk and concatenate them in index order.
    pub async fn read_all(&self) -> Result<Vec<CatalogEntry>, StoreError> {
        let docs = self.store.list(CHUNKS_COLLECTION).await?;

        let mut chunks = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            let chunk: CatalogChunk = serde_json::from_value(doc)?;
            if chunk.count != chunk.data.len() {
                log::warn!(
                    "Chunk {} declares {} entries but holds {}",
                    id,
                    chunk.count,
                    chunk.data.len()
                );
            }
            chunks.push(chunk);
        }
        chunks.sort_by_key(|c| c.index);

        let total = chunks.iter().map(|c| c.data.len()).sum();
        let mut entries = Vec::with_capacity(total);
        for chunk in chunks {
            entries.extend(chunk.data);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: usize) -> Vec<CatalogEntry> {
        (0..n)
            .map(|i| CatalogEntry {
                name: format!("Card {i}"),
                set: "Test".into(),
                number: i.to_string(),
                condition: "NM".into(),
                price: "1.00".into(),
            })
            .collect()
    }

    #[test]
    fn split_sizes() {
        let chunks = split_into_chunks(&entries(4500), CHUNK_SIZE);
        let counts: Vec<usize> = chunks.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![2000, 2000, 500]);
        assert_eq!(chunks[2].index, 2);
        assert_eq!(chunks[2].data[0].name, "Card 4000");
    }

    #[test]
    fn split_empty() {
        assert!(split_into_chunks(&[], CHUNK_SIZE).is_empty());
    }

    #[test]
    fn chunk_ids() {
        assert_eq!(chunk_id(0), "chunk_0");
        assert_eq!(chunk_id(12), "chunk_12");
    }

    #[test]
    fn chunk_json_layout() {
        let chunk = &split_into_chunks(&entries(1), CHUNK_SIZE)[0];
        let v = serde_json::to_value(chunk).unwrap();
        assert_eq!(v["index"], 0);
        assert_eq!(v["count"], 1);
        assert!(v["updatedAt"].is_string());
        assert_eq!(v["data"][0]["name"], "Card 0");
    }
}
