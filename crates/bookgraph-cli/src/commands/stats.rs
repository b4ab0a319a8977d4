use anyhow::{Context, Result};
use bookgraph_config::Config;
use bookgraph_core::GraphIndex;

use crate::cli::StatsArgs;
use crate::output;

pub async fn execute(config: Config, args: StatsArgs) -> Result<()> {
    let dir = args.index.unwrap_or(config.storage.persist_dir);
    let index = GraphIndex::load(&dir)
        .with_context(|| format!("Failed to load index from {}", dir.display()))?;

    println!("Index Statistics ({})\n", dir.display());
    println!("{}", output::stats_table(&index));

    if !index.graph().is_empty() && args.top > 0 {
        println!("\nMost connected entities\n");
        println!("{}", output::entities_table(&index, args.top));
    }
    Ok(())
}
