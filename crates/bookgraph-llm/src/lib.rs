//! # Bookgraph LLM Providers
//!
//! HTTP implementations of the [`CompletionProvider`] and
//! [`EmbeddingProvider`] traits defined in `bookgraph-core`:
//!
//! - [`OpenAIChatProvider`]: any OpenAI-compatible `/chat/completions` API
//!   (DeepSeek by default)
//! - [`OllamaChatProvider`]: Ollama `/api/chat`
//! - [`OpenAIEmbeddingProvider`]: OpenAI-compatible `/embeddings`
//! - [`OllamaEmbeddingProvider`]: Ollama `/api/embed` (serves `bge-m3`)
//! - [`HashingEmbeddingProvider`]: deterministic, offline
//!
//! Use [`create_completion_provider`] and [`create_embedding_provider`] to
//! build them from configuration.
//!
//! [`CompletionProvider`]: bookgraph_core::CompletionProvider
//! [`EmbeddingProvider`]: bookgraph_core::EmbeddingProvider

pub mod chat;
pub mod embeddings;
mod error;
mod factory;
mod http;

pub use chat::{OllamaChatProvider, OpenAIChatProvider};
pub use embeddings::{HashingEmbeddingProvider, OllamaEmbeddingProvider, OpenAIEmbeddingProvider};
pub use error::{ProviderError, ProviderResult};
pub use factory::{create_completion_provider, create_embedding_provider};
