//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod embed;
pub mod index;
pub mod reindex;
pub mod remove;
pub mod search;
pub mod stats;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Reindex(args) => reindex::run(ctx, args),
        Commands::Index(args) => index::run(ctx, args),
        Commands::Remove(args) => remove::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Embed(args) => embed::run(ctx, args),
        Commands::Stats(args) => stats::run(ctx, args),
    }
}
