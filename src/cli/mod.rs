//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// dvds - Semantic search over a DVD catalog
#[derive(Parser, Debug)]
#[command(name = "dvds")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Emit JSON on stdout for machine consumption
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (replaces the global and project config files)
    #[arg(long, global = true, env = "DVDS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index every catalog item that has a description
    Reindex(commands::reindex::ReindexArgs),

    /// Index a single catalog item
    Index(commands::index::IndexArgs),

    /// Remove an item's embedding
    Remove(commands::remove::RemoveArgs),

    /// Hybrid semantic + lexical search
    Search(commands::search::SearchArgs),

    /// Inspect the embedding provider
    Embed(commands::embed::EmbedArgs),

    /// Show store statistics
    Stats(commands::stats::StatsArgs),
}
