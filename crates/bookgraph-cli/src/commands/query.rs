//! Query command: one-shot question or interactive session

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use bookgraph_config::Config;
use bookgraph_core::GraphIndex;
use tokio::io::BufReader;
use tracing::warn;

use super::repl::run_repl;
use crate::cli::QueryArgs;
use crate::{factories, output};

pub async fn execute(config: Config, args: QueryArgs) -> Result<()> {
    let dir = args
        .index
        .clone()
        .unwrap_or_else(|| config.storage.persist_dir.clone());
    let index = GraphIndex::load(&dir)
        .with_context(|| format!("Failed to load index from {}", dir.display()))?;

    let embedder = factories::create_embedder(&config)?;
    if let Some(message) = embedding_model_mismatch(&index, embedder.model_name()) {
        warn!("{}", message);
        output::warning(&message);
    }

    let mut engine = factories::create_query_engine(&config, Arc::new(index), embedder)?;
    if let Some(top_k) = args.top_k {
        ensure!(top_k > 0, "--top-k must be greater than 0");
        engine = engine.with_top_k(top_k);
    }

    match args.query {
        Some(question) => {
            let answer = engine.query(&question).await.context("Query failed")?;
            println!("{}", answer.answer.trim_end());
        }
        None => {
            let stats = run_repl(
                &engine,
                BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            )
            .await?;
            tracing::info!(
                "Session ended: {} answered, {} failed",
                stats.answered,
                stats.failed
            );
        }
    }
    Ok(())
}

/// Warning text when the index was embedded with a different model
pub fn embedding_model_mismatch(index: &GraphIndex, configured: &str) -> Option<String> {
    let manifest = index.manifest()?;
    (manifest.embedding_model != configured).then(|| {
        format!(
            "index was embedded with '{}' but '{}' is configured; results will be unreliable",
            manifest.embedding_model, configured
        )
    })
}
