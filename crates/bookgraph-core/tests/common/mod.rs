//! Shared fixtures for bookgraph-core integration tests

#![allow(dead_code)]

use std::sync::Arc;

use bookgraph_config::{ExtractionConfig, RetrievalConfig, RetryConfig};
use bookgraph_core::test_support::mocks::{KeywordEmbeddingProvider, ScriptedCompletionProvider};
use bookgraph_core::{
    BuildSettings, ComposeOptions, IndexBuilder, PromptTemplate, Record, RecordIngestor,
    ResponseComposer, Retriever, TripletExtractor,
};

/// Three books: two linked through B, one isolated
pub const SCENARIO_CSV: &str = "\
book_id,book_name,book_summary
1,First,A meets B
2,Second,B meets C
3,Third,D alone
";

pub const SCENARIO_VOCABULARY: [&str; 4] = ["a", "b", "c", "d"];

pub fn scenario_records() -> Vec<Record> {
    RecordIngestor::new()
        .ingest_reader(SCENARIO_CSV.as_bytes())
        .expect("scenario CSV is valid")
}

/// Completion script for the build phase of the scenario
pub fn scenario_completion() -> Arc<ScriptedCompletionProvider> {
    let provider = Arc::new(ScriptedCompletionProvider::new());
    provider.respond_when("SOURCE ID: 1\n", "(A, MEETS, B)");
    provider.respond_when("SOURCE ID: 2\n", "(B, MEETS, C)");
    provider.respond_when("SOURCE ID: 3\n", "There are no relationships in this text.");
    provider
}

pub fn scenario_embedder() -> Arc<KeywordEmbeddingProvider> {
    Arc::new(KeywordEmbeddingProvider::new(&SCENARIO_VOCABULARY))
}

/// No sleeping between attempts
pub fn fast_retry() -> RetryConfig {
    RetryConfig::immediate(3)
}

pub fn builder(
    completion: Arc<ScriptedCompletionProvider>,
    embedder: Arc<KeywordEmbeddingProvider>,
) -> IndexBuilder {
    let extractor = TripletExtractor::new(
        completion,
        ExtractionConfig::default(),
        fast_retry(),
        PromptTemplate::default_extraction(),
    );
    IndexBuilder::new(
        extractor,
        embedder,
        BuildSettings {
            concurrency: 2,
            batch_size: 2,
            retry: fast_retry(),
        },
    )
}

pub fn retriever(embedder: Arc<KeywordEmbeddingProvider>) -> Retriever {
    Retriever::new(embedder, RetrievalConfig::default(), fast_retry())
}

pub fn composer(completion: Arc<ScriptedCompletionProvider>) -> ResponseComposer {
    ResponseComposer::new(
        completion,
        ComposeOptions::default(),
        fast_retry(),
        PromptTemplate::default_response(),
    )
}
