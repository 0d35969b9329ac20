//! SQLite embedding store

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{DsError, Result};
use crate::storage::codec::{decode_vector, dims_of, encode_vector};
use crate::storage::{EmbeddingRecord, ItemId, VectorStore, check_dims, migrations};

const DIMS_KEY: &str = "dims";

struct Inner {
    conn: Connection,
    dims: Option<usize>,
}

/// SQLite-backed vector store.
///
/// A single connection sits behind a mutex: writes for the same item are
/// serialized and a scan reads whole rows under the lock.
pub struct SqliteVectorStore {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
    schema_version: u32,
}

impl std::fmt::Debug for SqliteVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVectorStore")
            .field("path", &self.path)
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl SqliteVectorStore {
    /// Open the store at the given path.
    ///
    /// `configured_dims` is the provider's dimensionality. It must agree with
    /// the dimensionality persisted in a non-empty store.
    pub fn open(path: impl AsRef<Path>, configured_dims: Option<usize>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::from_connection(conn, configured_dims, Some(path.to_path_buf()))
    }

    /// Open a private in-memory store.
    pub fn open_in_memory(configured_dims: Option<usize>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, configured_dims, None)
    }

    fn from_connection(
        conn: Connection,
        configured_dims: Option<usize>,
        path: Option<PathBuf>,
    ) -> Result<Self> {
        let schema_version = migrations::run_migrations(&conn)?;
        let persisted = read_dims(&conn)?;
        let count = count_records(&conn)?;

        let dims = match (persisted, configured_dims) {
            (Some(stored), Some(configured)) if stored != configured => {
                if count > 0 {
                    return Err(DsError::DimensionMismatch {
                        expected: stored,
                        actual: configured,
                    });
                }
                tracing::info!(
                    from = stored,
                    to = configured,
                    "re-establishing dims on empty store"
                );
                write_dims(&conn, configured)?;
                Some(configured)
            }
            (Some(stored), _) => Some(stored),
            (None, Some(configured)) => {
                write_dims(&conn, configured)?;
                Some(configured)
            }
            (None, None) => None,
        };

        tracing::debug!(?path, ?dims, records = count, "opened embedding store");

        Ok(Self {
            inner: Mutex::new(Inner { conn, dims }),
            path,
            schema_version,
        })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }

    /// Location on disk, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Fetch a single record's vector.
    pub fn get(&self, item_id: ItemId) -> Result<Option<Vec<f32>>> {
        let inner = self.inner.lock();
        let blob: Option<Vec<u8>> = inner
            .conn
            .query_row(
                "SELECT embedding FROM item_embeddings WHERE item_id = ?",
                [item_id],
                |row| row.get(0),
            )
            .optional()?;
        blob.map(|bytes| decode_record(item_id, &bytes, inner.dims))
            .transpose()
    }
}

impl VectorStore for SqliteVectorStore {
    fn put(&self, item_id: ItemId, vector: &[f32]) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        check_dims(inner.dims, vector.len())?;

        let encoded = encode_vector(vector);
        let tx = inner.conn.transaction()?;
        if inner.dims.is_none() {
            write_dims(&tx, vector.len())?;
        }
        tx.execute(
            "INSERT INTO item_embeddings (item_id, embedding) VALUES (?, ?)
             ON CONFLICT(item_id) DO UPDATE SET embedding = excluded.embedding",
            params![item_id, encoded],
        )?;
        tx.commit()?;

        inner.dims.get_or_insert(vector.len());
        Ok(())
    }

    fn remove(&self, item_id: ItemId) -> Result<bool> {
        let inner = self.inner.lock();
        let deleted = inner
            .conn
            .execute("DELETE FROM item_embeddings WHERE item_id = ?", [item_id])?;
        Ok(deleted > 0)
    }

    fn scan_all(&self) -> Result<Vec<EmbeddingRecord>> {
        let inner = self.inner.lock();
        let mut stmt = inner
            .conn
            .prepare("SELECT item_id, embedding FROM item_embeddings")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, ItemId>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (item_id, blob) = row?;
            records.push(EmbeddingRecord {
                item_id,
                vector: decode_record(item_id, &blob, inner.dims)?,
            });
        }
        Ok(records)
    }

    fn len(&self) -> Result<usize> {
        count_records(&self.inner.lock().conn)
    }

    fn dims(&self) -> Option<usize> {
        self.inner.lock().dims
    }
}

fn decode_record(item_id: ItemId, blob: &[u8], dims: Option<usize>) -> Result<Vec<f32>> {
    let corrupt = |reason: String| DsError::CorruptRecord { item_id, reason };
    let found = dims_of(blob.len())
        .ok_or_else(|| corrupt(format!("blob length {} is not whole f32s", blob.len())))?;
    if let Some(expected) = dims {
        if found != expected {
            return Err(corrupt(format!("expected {expected} dims, found {found}")));
        }
    }
    decode_vector(blob).map_err(|err| corrupt(err.to_string()))
}

fn count_records(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM item_embeddings", [], |row| {
        row.get(0)
    })?;
    Ok(count.max(0) as usize)
}

fn read_dims(conn: &Connection) -> Result<Option<usize>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = ?",
            [DIMS_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value
        .map(|raw| {
            raw.parse::<usize>().map_err(|err| {
                DsError::StoreUnavailable(format!("invalid stored dims {raw:?}: {err}"))
            })
        })
        .transpose()
}

fn write_dims(conn: &Connection, dims: usize) -> Result<()> {
    conn.execute(
        "INSERT INTO store_meta (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![DIMS_KEY, dims.to_string()],
    )?;
    Ok(())
}
