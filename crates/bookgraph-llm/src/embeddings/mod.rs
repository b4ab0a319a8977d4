//! Embedding provider implementations

pub mod hashing;
pub mod ollama;
pub mod openai;

pub use hashing::HashingEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAIEmbeddingProvider;
