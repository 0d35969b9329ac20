//! Embedding store
//!
//! Durable `item_id -> vector` mapping with full-scan reads. The store is a
//! derived index over the catalog, never a source of truth: every record
//! can be rebuilt with `dvds reindex`.

pub mod codec;
pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::{DsError, Result};

/// External catalog key.
pub type ItemId = i64;

/// One stored embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingRecord {
    pub item_id: ItemId,
    pub vector: Vec<f32>,
}

/// Key -> vector storage backing the hybrid search engine.
///
/// Implementations must be safe to share across threads. A scan running
/// alongside writes may or may not observe them, but every record it
/// returns is whole.
pub trait VectorStore: Send + Sync {
    /// Insert or replace the record for `item_id`.
    ///
    /// Fails with [`DsError::DimensionMismatch`] when the store has an
    /// established dimensionality that differs from `vector.len()`; the
    /// prior record is untouched in that case.
    fn put(&self, item_id: ItemId, vector: &[f32]) -> Result<()>;

    /// Remove the record for `item_id`. Returns whether a record existed.
    fn remove(&self, item_id: ItemId) -> Result<bool>;

    /// Every stored record, in no particular order.
    fn scan_all(&self) -> Result<Vec<EmbeddingRecord>>;

    /// Number of stored records.
    fn len(&self) -> Result<usize>;

    /// Whether the store holds no records.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Established dimensionality, if any.
    fn dims(&self) -> Option<usize>;
}

/// Check `actual` against an established dimensionality.
pub(crate) fn check_dims(established: Option<usize>, actual: usize) -> Result<()> {
    match established {
        Some(expected) if expected != actual => {
            Err(DsError::DimensionMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}
