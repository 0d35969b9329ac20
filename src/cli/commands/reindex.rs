//! dvds reindex - Index every catalog item
//!
//! Items without a description are skipped. Encoding runs in parallel; the
//! store serializes the writes.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::search::HybridSearch;
use crate::storage::ItemId;

#[derive(Args, Debug)]
pub struct ReindexArgs {
    /// Catalog JSON file (default: [catalog].path)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Also remove stored embeddings for ids missing from the catalog
    #[arg(long)]
    pub prune: bool,
}

/// Outcome of a bulk reindex.
#[derive(Debug, Default, Serialize)]
pub struct ReindexReport {
    pub indexed: usize,
    /// Items skipped for lacking a description
    pub skipped: Vec<ItemId>,
    pub failed: Vec<FailedItem>,
    pub pruned: Vec<ItemId>,
}

#[derive(Debug, Serialize)]
pub struct FailedItem {
    pub item_id: ItemId,
    pub error: String,
}

pub fn run(ctx: &AppContext, args: &ReindexArgs) -> Result<()> {
    let catalog = ctx.load_catalog(args.catalog.as_deref())?;
    let start = Instant::now();
    let report = reindex_catalog(&ctx.engine, &catalog, args.prune)?;
    let elapsed = start.elapsed();

    tracing::info!(
        indexed = report.indexed,
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        pruned = report.pruned.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "reindex complete"
    );

    if ctx.robot_mode {
        let output = serde_json::json!({
            "status": if report.failed.is_empty() { "ok" } else { "partial" },
            "indexed": report.indexed,
            "skipped": report.skipped,
            "failed": report.failed,
            "pruned": report.pruned,
            "elapsed_ms": elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} Indexed {} items in {:.2}s",
        "✓".green(),
        report.indexed.to_string().cyan(),
        elapsed.as_secs_f64()
    );
    if !report.skipped.is_empty() {
        println!(
            "  {} skipped (no description): {}",
            report.skipped.len().to_string().yellow(),
            join_ids(&report.skipped)
        );
    }
    if !report.pruned.is_empty() {
        println!(
            "  {} pruned: {}",
            report.pruned.len().to_string().yellow(),
            join_ids(&report.pruned)
        );
    }
    for failed in &report.failed {
        println!("  {} item {}: {}", "✗".red(), failed.item_id, failed.error);
    }

    Ok(())
}

/// Index every describable catalog item, optionally pruning orphans.
///
/// Per-item failures are collected, not propagated; a failing item keeps
/// whatever record it had before.
pub fn reindex_catalog(
    engine: &HybridSearch,
    catalog: &Catalog,
    prune: bool,
) -> Result<ReindexReport> {
    let (indexable, skipped): (Vec<_>, Vec<_>) =
        catalog.items().partition(|item| item.is_indexable());

    for item in &skipped {
        tracing::warn!(item_id = item.item_id, "skipping item without description");
    }

    let outcomes: Vec<(ItemId, Result<()>)> = indexable
        .par_iter()
        .map(|item| (item.item_id, engine.index(item.item_id, &item.enriched_text())))
        .collect();

    let mut report = ReindexReport {
        skipped: skipped.iter().map(|item| item.item_id).collect(),
        ..ReindexReport::default()
    };

    for (item_id, outcome) in outcomes {
        match outcome {
            Ok(()) => report.indexed += 1,
            Err(err) => {
                tracing::warn!(item_id, error = %err, "failed to index item");
                report.failed.push(FailedItem {
                    item_id,
                    error: err.to_string(),
                });
            }
        }
    }

    if prune {
        let known: HashSet<ItemId> = catalog.items().map(|item| item.item_id).collect();
        let mut orphans: Vec<ItemId> = engine
            .store()
            .scan_all()?
            .into_iter()
            .map(|record| record.item_id)
            .filter(|id| !known.contains(id))
            .collect();
        orphans.sort_unstable();

        for item_id in orphans {
            if engine.remove(item_id)? {
                report.pruned.push(item_id);
            }
        }
    }

    Ok(report)
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
