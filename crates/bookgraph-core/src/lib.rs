//! # Bookgraph Core
//!
//! Knowledge-graph retrieval over a corpus of book summaries.
//!
//! The build phase ingests a CSV ([`RecordIngestor`]), asks a completion model
//! for `(subject, RELATION, object)` triplets per record ([`TripletExtractor`]),
//! links them into a [`GraphStore`], embeds every record into an
//! [`EmbeddingIndex`] and persists the resulting [`GraphIndex`].
//!
//! The query phase loads that index and, per question, runs a [`Retriever`]
//! (vector search plus graph expansion) and a [`ResponseComposer`], wired
//! together by [`QueryEngine`].
//!
//! Remote models are reached only through the [`CompletionProvider`] and
//! [`EmbeddingProvider`] traits.

pub mod compose;
pub mod error;
pub mod extraction;
pub mod graph;
pub mod index;
pub mod ingest;
pub mod pipeline;
pub mod prompts;
pub mod query;
pub mod retrieval;
pub mod retry;
pub mod test_support;
pub mod traits;
pub mod types;
pub mod vector;

pub use compose::{render_context, ComposeOptions, ResponseComposer};
pub use error::{ApiError, ApiResult, BookgraphError, BookgraphResult};
pub use extraction::{parse_triplet_line, ExtractionOutcome, ParseError, TripletExtractor};
pub use graph::GraphStore;
pub use index::{GraphIndex, IndexManifest, IndexStats};
pub use ingest::RecordIngestor;
pub use pipeline::{BuildEvent, BuildSettings, BuildSummary, IndexBuilder, ProgressCallback};
pub use prompts::PromptTemplate;
pub use query::{QueryAnswer, QueryEngine};
pub use retrieval::Retriever;
pub use retry::retry_with_backoff;
pub use traits::{CompletionProvider, CompletionRequest, EmbeddingProvider};
pub use types::{ContextBundle, GraphNode, Record, Triplet, TripletId};
pub use vector::{EmbeddingFailure, EmbeddingIndex};
