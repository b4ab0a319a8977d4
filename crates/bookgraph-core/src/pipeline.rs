//! Offline build: records -> triplets -> graph + vectors -> index

use std::sync::Arc;
use std::time::{Duration, Instant};

use bookgraph_config::{EmbeddingConfig, ExtractionConfig, RetryConfig};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::BookgraphResult;
use crate::extraction::{ExtractionOutcome, TripletExtractor};
use crate::graph::GraphStore;
use crate::index::{GraphIndex, IndexManifest};
use crate::traits::EmbeddingProvider;
use crate::types::Record;
use crate::vector::{EmbeddingFailure, EmbeddingIndex};

/// Progress notifications emitted while building
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    ExtractionStarted { total: usize },
    RecordExtracted { record_id: String, triplets: usize },
    EmbeddingStarted { total: usize },
    Finished,
}

/// Callback receiving [`BuildEvent`]s
pub type ProgressCallback = Arc<dyn Fn(BuildEvent) + Send + Sync>;

/// A record whose extraction failed after retries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub record_id: String,
    pub reason: String,
}

/// End-of-build report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub records: usize,
    pub triplets: usize,
    pub nodes: usize,
    pub vectors: usize,
    /// Records that yielded at least one triplet
    pub extracted_records: usize,
    /// Records whose response held no parsable triplet
    pub empty_records: Vec<String>,
    /// Records skipped because extraction kept failing
    pub skipped_records: Vec<SkippedRecord>,
    /// Records left without a vector
    pub embedding_failures: Vec<EmbeddingFailure>,
    pub malformed_lines: usize,
    /// Triplets dropped by the per-record cap
    pub truncated_triplets: usize,
    pub elapsed: Duration,
}

impl BuildSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped_records.len()
    }

    /// Whether every record produced triplets and a vector
    pub fn is_clean(&self) -> bool {
        self.empty_records.is_empty()
            && self.skipped_records.is_empty()
            && self.embedding_failures.is_empty()
    }
}

/// Knobs of the build that are not owned by a single component
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    /// Extraction requests in flight at once
    pub concurrency: usize,
    /// Texts per embedding request
    pub batch_size: usize,
    pub retry: RetryConfig,
}

impl BuildSettings {
    pub fn from_config(
        extraction: &ExtractionConfig,
        embedding: &EmbeddingConfig,
        retry: &RetryConfig,
    ) -> Self {
        Self {
            concurrency: extraction.concurrency,
            batch_size: embedding.batch_size,
            retry: retry.clone(),
        }
    }
}

/// Runs the build phase over an ingested corpus
pub struct IndexBuilder {
    extractor: TripletExtractor,
    embedder: Arc<dyn EmbeddingProvider>,
    settings: BuildSettings,
    progress: Option<ProgressCallback>,
}

impl IndexBuilder {
    pub fn new(
        extractor: TripletExtractor,
        embedder: Arc<dyn EmbeddingProvider>,
        settings: BuildSettings,
    ) -> Self {
        Self {
            extractor,
            embedder,
            settings,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    fn emit(&self, event: BuildEvent) {
        if let Some(progress) = &self.progress {
            progress(event);
        }
    }

    /// Build an index from `records`
    ///
    /// Per-record extraction and embedding failures are reported in the
    /// summary; only an internally inconsistent result is an error.
    pub async fn build(&self, records: Vec<Record>) -> BookgraphResult<(GraphIndex, BuildSummary)> {
        let started = Instant::now();
        let mut summary = BuildSummary {
            records: records.len(),
            ..Default::default()
        };
        if records.is_empty() {
            warn!("Building an index from an empty corpus");
        }

        info!(
            "Extracting triplets from {} records ({} concurrent requests)",
            records.len(),
            self.settings.concurrency
        );
        self.emit(BuildEvent::ExtractionStarted {
            total: records.len(),
        });

        let mut graph = GraphStore::new();
        let extractor = &self.extractor;
        // `buffered` yields in input order, so the graph is identical whatever
        // order the responses arrive in
        let mut outcomes = stream::iter(&records)
            .map(|record| async move { (record, extractor.extract(record).await) })
            .buffered(self.settings.concurrency.max(1));

        while let Some((record, outcome)) = outcomes.next().await {
            summary.malformed_lines += outcome.malformed_lines();
            let count = outcome.triplets().len();
            match outcome {
                ExtractionOutcome::Extracted {
                    triplets,
                    truncated,
                    ..
                } => {
                    summary.extracted_records += 1;
                    summary.truncated_triplets += truncated;
                    for triplet in triplets {
                        graph.add_triplet(triplet);
                    }
                }
                ExtractionOutcome::Empty { .. } => summary.empty_records.push(record.id.clone()),
                ExtractionOutcome::Failed { error } => summary.skipped_records.push(SkippedRecord {
                    record_id: record.id.clone(),
                    reason: error.to_string(),
                }),
            }
            self.emit(BuildEvent::RecordExtracted {
                record_id: record.id.clone(),
                triplets: count,
            });
        }
        drop(outcomes);

        info!(
            "Extracted {} triplets over {} entities ({} records skipped)",
            graph.len(),
            graph.node_count(),
            summary.skipped_count()
        );

        self.emit(BuildEvent::EmbeddingStarted {
            total: records.len(),
        });
        let (vectors, embedding_failures) = EmbeddingIndex::embed_all(
            &records,
            self.embedder.as_ref(),
            self.settings.batch_size,
            &self.settings.retry,
        )
        .await;

        summary.triplets = graph.len();
        summary.nodes = graph.node_count();
        summary.vectors = vectors.len();
        summary.embedding_failures = embedding_failures;

        let manifest = IndexManifest::new(
            self.extractor.model_name(),
            self.embedder.model_name(),
            vectors.dimension().or(self.embedder.dimensions()),
            records.len(),
            graph.len(),
        );
        let index = GraphIndex::new(records, graph, vectors)?.with_manifest(manifest);

        summary.elapsed = started.elapsed();
        self.emit(BuildEvent::Finished);
        info!(
            "Build finished in {:.1?}: {} records, {} triplets, {} vectors",
            summary.elapsed, summary.records, summary.triplets, summary.vectors
        );
        Ok((index, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::prompts::PromptTemplate;
    use crate::test_support::mocks::{KeywordEmbeddingProvider, ScriptedCompletionProvider};
    use std::sync::Mutex;

    fn builder(completion: Arc<ScriptedCompletionProvider>, concurrency: usize) -> IndexBuilder {
        let retry = RetryConfig::immediate(3);
        let extractor = TripletExtractor::new(
            completion,
            ExtractionConfig::default(),
            retry.clone(),
            PromptTemplate::default_extraction(),
        );
        IndexBuilder::new(
            extractor,
            Arc::new(KeywordEmbeddingProvider::new(&["a", "b"])),
            BuildSettings {
                concurrency,
                batch_size: 2,
                retry,
            },
        )
    }

    #[tokio::test]
    async fn test_summary_counts() {
        let completion = Arc::new(ScriptedCompletionProvider::new());
        completion.respond_when("SOURCE ID: 1", "(A, R, B)\n(A, R, C)\n???");
        completion.respond_when("SOURCE ID: 2", "nothing here");
        completion.fail_when("SOURCE ID: 3", ApiError::http(500, "down"));

        let records = vec![
            Record::new("1", "One", "a"),
            Record::new("2", "Two", "b"),
            Record::new("3", "Three", "a b"),
        ];
        let (index, summary) = builder(completion, 2).build(records).await.unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.triplets, 2);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.vectors, 3);
        assert_eq!(summary.extracted_records, 1);
        assert_eq!(summary.empty_records, vec!["2".to_string()]);
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(summary.malformed_lines, 2);
        assert!(!summary.is_clean());

        let manifest = index.manifest().unwrap();
        assert_eq!(manifest.chat_model, "scripted-completion");
        assert_eq!(manifest.record_count, 3);
    }

    #[tokio::test]
    async fn test_merge_follows_record_order() {
        let completion = Arc::new(ScriptedCompletionProvider::new());
        for i in 1..=6 {
            completion.respond_when(format!("SOURCE ID: {i}\n"), format!("(E{i}, R, F{i})"));
        }
        let records: Vec<Record> = (1..=6)
            .map(|i| Record::new(i.to_string(), "T", ""))
            .collect();

        let (index, _) = builder(completion, 4).build(records).await.unwrap();

        let sources: Vec<&str> = index
            .graph()
            .triplets()
            .iter()
            .map(|t| t.source_record_id.as_str())
            .collect();
        assert_eq!(sources, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn test_progress_events() {
        let completion = Arc::new(ScriptedCompletionProvider::new().with_default_reply("(A, R, B)"));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        builder(completion, 1)
            .with_progress(Arc::new(move |event| sink.lock().unwrap().push(event)))
            .build(vec![Record::new("1", "T", "")])
            .await
            .unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                BuildEvent::ExtractionStarted { total: 1 },
                BuildEvent::RecordExtracted {
                    record_id: "1".into(),
                    triplets: 1
                },
                BuildEvent::EmbeddingStarted { total: 1 },
                BuildEvent::Finished,
            ]
        );
    }
}
