//! dvds stats - Show store statistics

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::storage::VectorStore;

#[derive(Args, Debug)]
pub struct StatsArgs {}

pub fn run(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    let records = ctx.store.len()?;
    let dims = ctx.store.dims();
    let embedder = ctx.engine.embedder();
    let store_path = ctx.store_path();

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "ok",
                "records": records,
                "dims": dims,
                "backend": embedder.name(),
                "provider_dims": embedder.dims(),
                "store_path": store_path,
                "schema_version": ctx.store.schema_version(),
                "config_path": ctx.config_path,
            }))?
        );
        return Ok(());
    }

    println!("{}", "Embedding Store".bold());
    println!("  Path: {}", store_path.display().to_string().cyan());
    println!("  Records: {}", records.to_string().cyan());
    match dims {
        Some(dims) => println!("  Dimensions: {}", dims.to_string().cyan()),
        None => println!("  Dimensions: {}", "not established".dimmed()),
    }
    println!("  Schema version: {}", ctx.store.schema_version());
    println!();
    println!("{}", "Embedding Provider".bold());
    println!("  Backend: {}", embedder.name().cyan());
    println!("  Dimensions: {}", embedder.dims());

    Ok(())
}
