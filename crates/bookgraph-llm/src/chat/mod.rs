//! Chat completion provider implementations

pub mod ollama;
pub mod openai;

// Re-export providers
pub use ollama::OllamaChatProvider;
pub use openai::OpenAIChatProvider;
