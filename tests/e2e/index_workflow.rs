//! E2E Scenario: Indexing Lifecycle
//!
//! Index, re-index, remove and bulk reindex against an on-disk store.

use std::sync::Arc;

use super::fixture::{DIMS, E2EFixture, item, sample_items};
use dvd_search::cli::commands::reindex::reindex_catalog;
use dvd_search::error::DsError;
use dvd_search::search::{HashEmbedder, HybridSearch};
use dvd_search::storage::VectorStore;
use rusqlite::Connection;

#[test]
fn indexing_is_idempotent() {
    let mut fixture = E2EFixture::new("idempotent_index");
    let (engine, store) = fixture.engine();

    fixture.log_step("Index the same text twice");
    engine.index(7, "Two brothers reunite after twenty years").unwrap();
    let first = store.get(7).unwrap().unwrap();
    engine.index(7, "Two brothers reunite after twenty years").unwrap();

    assert_eq!(store.len().unwrap(), 1);
    assert_eq!(store.get(7).unwrap().unwrap(), first);

    fixture.log_step("Re-index with new text replaces the vector");
    engine.index(7, "A heist goes wrong in the desert").unwrap();
    assert_eq!(store.len().unwrap(), 1);
    assert_ne!(store.get(7).unwrap().unwrap(), first);
}

#[test]
fn blobs_are_four_bytes_per_dimension() {
    let mut fixture = E2EFixture::new("blob_layout");
    let (engine, _store) = fixture.engine();

    fixture.log_step("Index one item and inspect the raw row");
    engine.index(1, "A lonely astronaut explores deep space").unwrap();

    let conn = Connection::open(&fixture.store_path).unwrap();
    let len: i64 = conn
        .query_row(
            "SELECT length(embedding) FROM item_embeddings WHERE item_id = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(len, (DIMS * 4) as i64);
}

#[test]
fn dimension_mismatch_leaves_prior_record() {
    let mut fixture = E2EFixture::new("dimension_mismatch");
    let (engine, store) = fixture.engine();

    fixture.log_step("Establish the store at the provider's dimensionality");
    engine.index(1, "A lonely astronaut explores deep space").unwrap();
    let before = store.get(1).unwrap().unwrap();

    fixture.log_step("Write through a provider with a different dimensionality");
    let narrow = HybridSearch::new(Arc::new(HashEmbedder::new(8)), store.clone());
    let err = narrow.index(1, "A clown makes children laugh").unwrap_err();
    assert!(matches!(
        err,
        DsError::DimensionMismatch {
            expected: DIMS,
            actual: 8
        }
    ));
    assert_eq!(store.get(1).unwrap().unwrap(), before);

    fixture.log_step("Reopening with other dims fails while populated");
    drop(engine);
    drop(narrow);
    drop(store);
    let reopened = dvd_search::storage::SqliteVectorStore::open(&fixture.store_path, Some(8));
    assert!(matches!(reopened, Err(DsError::DimensionMismatch { .. })));
}

#[test]
fn empty_text_is_rejected_without_touching_store() {
    let mut fixture = E2EFixture::new("empty_text");
    let (engine, store) = fixture.engine();

    engine.index(3, "Colonists struggle to survive on Mars").unwrap();
    let before = store.get(3).unwrap().unwrap();

    fixture.log_step("Index blank text over an existing record");
    assert!(matches!(engine.index(3, " \t"), Err(DsError::EmptyText)));
    assert_eq!(store.get(3).unwrap().unwrap(), before);
}

#[test]
fn remove_reports_presence() {
    let mut fixture = E2EFixture::new("remove");
    let (engine, store) = fixture.engine();

    engine.index(4, "A fisherman waits for a ship").unwrap();

    fixture.log_step("Remove present then absent id");
    assert!(engine.remove(4).unwrap());
    assert!(!engine.remove(4).unwrap());
    assert!(store.get(4).unwrap().is_none());
    assert!(store.is_empty().unwrap());
}

#[test]
fn bulk_reindex_then_prune() {
    let mut fixture = E2EFixture::new("bulk_reindex");
    let (engine, store) = fixture.engine();

    fixture.log_step("Reindex full catalog");
    let catalog = fixture.write_catalog(&sample_items());
    let report = reindex_catalog(&engine, &catalog, false).unwrap();
    assert_eq!(report.indexed, 4);
    assert_eq!(report.skipped, vec![5]);
    assert!(report.failed.is_empty());
    assert_eq!(store.len().unwrap(), 4);

    fixture.log_step("Drop an item from the catalog and prune");
    let mut items = sample_items();
    items.retain(|i| i.item_id != 2);
    items.push(item(6, "Night Train", "Thriller", "A stranger boards the last train"));
    let catalog = fixture.write_catalog(&items);

    let report = reindex_catalog(&engine, &catalog, true).unwrap();
    assert_eq!(report.indexed, 4);
    assert_eq!(report.pruned, vec![2]);
    assert!(store.get(2).unwrap().is_none());
    assert!(store.get(6).unwrap().is_some());
}
