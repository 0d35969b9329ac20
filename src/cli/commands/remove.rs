//! dvds remove - Remove an item's embedding

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::storage::ItemId;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Item id whose embedding to remove
    pub item_id: ItemId,
}

pub fn run(ctx: &AppContext, args: &RemoveArgs) -> Result<()> {
    let removed = ctx.engine.remove(args.item_id)?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "item_id": args.item_id,
                "removed": removed,
            })
        );
    } else if removed {
        println!("{} Removed embedding for {}", "✓".green(), args.item_id);
    } else {
        println!(
            "{} No embedding stored for {}",
            "!".yellow(),
            args.item_id
        );
    }

    Ok(())
}
