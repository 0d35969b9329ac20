//! dvds search - Search the catalog
//!
//! `hybrid` mode ranks stored embeddings by cosine similarity plus an
//! exact-match boost, restricted to catalog items (optionally of one genre).
//! `keyword` mode matches titles only and never calls the embedding provider.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::{Catalog, CatalogItem};
use crate::error::Result;
use crate::search::{LexicalMatch, ScoredCandidate};
use crate::storage::ItemId;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (matched case-sensitively for the lexical boost)
    pub query: String,

    /// Catalog JSON file (default: [catalog].path)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Restrict results to one genre
    #[arg(long, short)]
    pub genre: Option<String>,

    /// Maximum number of results (default: [search].default_limit)
    #[arg(long, short)]
    pub limit: Option<usize>,

    /// Search mode
    #[arg(long, short, value_enum, default_value_t = SearchMode::Hybrid)]
    pub mode: SearchMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Embedding similarity plus title/description boost
    Hybrid,
    /// Case-insensitive title substring match, no embeddings
    Keyword,
}

/// A keyword-mode hit.
#[derive(Debug, Serialize)]
pub struct KeywordHit<'a> {
    pub rank: usize,
    pub item_id: ItemId,
    pub title: &'a str,
    pub genre: &'a str,
}

/// A ranked hit joined back to its catalog entry.
#[derive(Debug, Serialize)]
pub struct SearchHit<'a> {
    pub rank: usize,
    pub item_id: ItemId,
    pub title: &'a str,
    pub genre: &'a str,
    pub similarity: f32,
    pub lexical_bonus: f32,
    pub final_score: f32,
    pub lexical_match: LexicalMatch,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let catalog = ctx.load_catalog(args.catalog.as_deref())?;
    let limit = args.limit.unwrap_or(ctx.config.search.default_limit);

    match args.mode {
        SearchMode::Hybrid => run_hybrid(ctx, args, &catalog, limit),
        SearchMode::Keyword => run_keyword(ctx, args, &catalog, limit),
    }
}

fn run_keyword(ctx: &AppContext, args: &SearchArgs, catalog: &Catalog, limit: usize) -> Result<()> {
    let filter = catalog.filter(args.genre.as_deref());
    let matches = filter.title_matches(&args.query, limit)?;
    let hits = keyword_hits(&matches);
    tracing::debug!(query = %args.query, returned = hits.len(), "keyword search complete");

    if ctx.robot_mode {
        let output = serde_json::json!({
            "status": "ok",
            "mode": SearchMode::Keyword,
            "query": args.query,
            "genre": filter.genre(),
            "limit": limit,
            "count": hits.len(),
            "results": hits,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("{}", "No titles matched".yellow());
        return Ok(());
    }

    for hit in &hits {
        println!(
            "{:>3}. {} {}  id {}",
            hit.rank,
            hit.title.bold(),
            format!("({})", hit.genre).dimmed(),
            hit.item_id
        );
    }
    Ok(())
}

fn run_hybrid(ctx: &AppContext, args: &SearchArgs, catalog: &Catalog, limit: usize) -> Result<()> {
    let filter = catalog.filter(args.genre.as_deref());
    let candidates = ctx.engine.search(&args.query, &filter, limit)?;
    let hits = join_hits(catalog, &candidates);

    if ctx.robot_mode {
        let output = serde_json::json!({
            "status": "ok",
            "mode": SearchMode::Hybrid,
            "query": args.query,
            "genre": filter.genre(),
            "limit": limit,
            "count": hits.len(),
            "results": hits,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("{}", "No results found".yellow());
        return Ok(());
    }

    println!(
        "{} results for {}",
        hits.len().to_string().bold(),
        format!("\"{}\"", args.query).cyan()
    );
    println!();

    for hit in &hits {
        let marker = match hit.lexical_match {
            LexicalMatch::Title => " [title match]".green().to_string(),
            LexicalMatch::Description => " [description match]".green().to_string(),
            LexicalMatch::None => String::new(),
        };
        println!(
            "{:>3}. {} {}{}",
            hit.rank,
            hit.title.bold(),
            format!("({})", hit.genre).dimmed(),
            marker
        );
        println!(
            "     id {}  score {:.4}  cosine {:.4}",
            hit.item_id,
            hit.final_score,
            hit.similarity
        );
    }

    Ok(())
}

fn keyword_hits<'a>(items: &[&'a CatalogItem]) -> Vec<KeywordHit<'a>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| KeywordHit {
            rank: index + 1,
            item_id: item.item_id,
            title: &item.title,
            genre: &item.genre,
        })
        .collect()
}

/// Attach catalog titles to candidates, preserving ranking order.
pub fn join_hits<'a>(catalog: &'a Catalog, candidates: &[ScoredCandidate]) -> Vec<SearchHit<'a>> {
    candidates
        .iter()
        .filter_map(|candidate| {
            let item = catalog.get(candidate.item_id)?;
            Some((candidate, item))
        })
        .enumerate()
        .map(|(index, (candidate, item))| SearchHit {
            rank: index + 1,
            item_id: candidate.item_id,
            title: &item.title,
            genre: &item.genre,
            similarity: candidate.similarity,
            lexical_bonus: candidate.lexical_bonus,
            final_score: candidate.final_score,
            lexical_match: candidate.lexical_match,
        })
        .collect()
}
