//! dvds index - Index a single catalog item

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::{DsError, Result};
use crate::storage::ItemId;

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Catalog item id
    pub item_id: ItemId,

    /// Catalog JSON file (default: [catalog].path)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &IndexArgs) -> Result<()> {
    let catalog = ctx.load_catalog(args.catalog.as_deref())?;
    let item = catalog.require(args.item_id)?;

    if !item.is_indexable() {
        return Err(DsError::EmptyText);
    }

    ctx.engine.index(item.item_id, &item.enriched_text())?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "item_id": item.item_id,
                "title": item.title,
                "dims": ctx.engine.embedder().dims(),
            })
        );
    } else {
        println!(
            "{} Indexed {} {}",
            "✓".green(),
            item.item_id.to_string().cyan(),
            item.title.bold()
        );
    }

    Ok(())
}
