//! Embedding store schema migrations

use rusqlite::Connection;

use crate::error::{DsError, Result};

const MIGRATIONS: [&str; 2] = [
    include_str!("../../migrations/001_item_embeddings.sql"),
    include_str!("../../migrations/002_store_meta.sql"),
];

pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Run all pending migrations, tracked through `PRAGMA user_version`.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|err| DsError::StoreUnavailable(err.to_string()))?;

    if current_version > SCHEMA_VERSION {
        return Err(DsError::StoreUnavailable(format!(
            "store schema version {current_version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let target_version = (idx + 1) as u32;
        if current_version >= target_version {
            continue;
        }

        conn.execute_batch(sql).map_err(|err| {
            DsError::StoreUnavailable(format!("migration {target_version} failed: {err}"))
        })?;
        conn.pragma_update(None, "user_version", target_version)
            .map_err(|err| {
                DsError::StoreUnavailable(format!(
                    "failed to set user_version {target_version}: {err}"
                ))
            })?;
        tracing::debug!(version = target_version, "applied store migration");
    }

    Ok(SCHEMA_VERSION)
}
