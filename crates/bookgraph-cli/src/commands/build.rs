//! Build command: CSV -> triplets + embeddings -> persisted index

use std::sync::Arc;

use anyhow::{Context, Result};
use bookgraph_config::Config;
use bookgraph_core::{BuildEvent, BuildSummary, RecordIngestor};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::cli::BuildArgs;
use crate::{config, factories, output};

pub async fn execute(mut config: Config, args: BuildArgs) -> Result<()> {
    config::apply_build_args(&mut config, &args)?;
    let input = config.storage.data_file.clone();
    let output_dir = config.storage.persist_dir.clone();

    let records = RecordIngestor::new()
        .ingest_path(&input)
        .with_context(|| format!("Failed to read records from {}", input.display()))?;
    output::info(&format!(
        "Loaded {} records from {}",
        records.len(),
        input.display()
    ));

    let pb = progress_bar()?;
    let builder = factories::create_index_builder(&config)?.with_progress(progress_callback(pb));
    let (index, summary) = builder.build(records).await.context("Index build failed")?;

    index
        .persist(&output_dir)
        .with_context(|| format!("Failed to write index to {}", output_dir.display()))?;
    info!("Index persisted to {}", output_dir.display());

    println!("{}", output::build_summary_table(&summary));
    report_problems(&summary);
    output::success(&format!("Index written to {}", output_dir.display()));
    Ok(())
}

fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn progress_callback(pb: ProgressBar) -> bookgraph_core::ProgressCallback {
    Arc::new(move |event: BuildEvent| match event {
        BuildEvent::ExtractionStarted { total } => {
            pb.set_length(total as u64);
            pb.set_message("extracting triplets");
        }
        BuildEvent::RecordExtracted {
            record_id,
            triplets,
        } => {
            pb.inc(1);
            pb.set_message(format!("record {} ({} triplets)", record_id, triplets));
        }
        BuildEvent::EmbeddingStarted { .. } => pb.set_message("embedding records"),
        BuildEvent::Finished => pb.finish_and_clear(),
    })
}

fn report_problems(summary: &BuildSummary) {
    for skipped in &summary.skipped_records {
        output::warning(&format!(
            "record {} skipped: {}",
            skipped.record_id, skipped.reason
        ));
    }
    for failure in &summary.embedding_failures {
        output::warning(&format!(
            "record {} has no embedding: {}",
            failure.record_id, failure.message
        ));
    }
    if !summary.empty_records.is_empty() {
        output::warning(&format!(
            "no triplets parsed for record(s): {}",
            summary.empty_records.join(", ")
        ));
    }
}
