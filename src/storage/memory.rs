//! In-process vector store.
//!
//! Same contract as the SQLite store without durability. Useful for tests
//! and for hosts that rebuild the index on startup.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::{EmbeddingRecord, ItemId, VectorStore, check_dims};

#[derive(Debug, Default)]
struct Inner {
    embeddings: HashMap<ItemId, Vec<f32>>,
    dims: Option<usize>,
}

/// In-memory vector store
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    inner: RwLock<Inner>,
}

impl MemoryVectorStore {
    /// Create an empty store; the first `put` establishes the dimensionality.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a fixed dimensionality.
    pub fn with_dims(dims: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                embeddings: HashMap::new(),
                dims: Some(dims),
            }),
        }
    }

    /// Fetch a single record's vector.
    pub fn get(&self, item_id: ItemId) -> Option<Vec<f32>> {
        self.inner.read().embeddings.get(&item_id).cloned()
    }
}

impl VectorStore for MemoryVectorStore {
    fn put(&self, item_id: ItemId, vector: &[f32]) -> Result<()> {
        let mut inner = self.inner.write();
        check_dims(inner.dims, vector.len())?;
        inner.dims.get_or_insert(vector.len());
        inner.embeddings.insert(item_id, vector.to_vec());
        Ok(())
    }

    fn remove(&self, item_id: ItemId) -> Result<bool> {
        Ok(self.inner.write().embeddings.remove(&item_id).is_some())
    }

    fn scan_all(&self) -> Result<Vec<EmbeddingRecord>> {
        let inner = self.inner.read();
        Ok(inner
            .embeddings
            .iter()
            .map(|(item_id, vector)| EmbeddingRecord {
                item_id: *item_id,
                vector: vector.clone(),
            })
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.inner.read().embeddings.len())
    }

    fn dims(&self) -> Option<usize> {
        self.inner.read().dims
    }
}
