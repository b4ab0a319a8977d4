//! Seams between the pipeline and the remote model services
//!
//! Core only talks to models through these traits; the HTTP implementations
//! live in `bookgraph-llm` and deterministic doubles in
//! [`crate::test_support::mocks`].

pub mod llm;

pub use llm::{CompletionProvider, CompletionRequest, EmbeddingProvider};
