//! Completion and embedding provider traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

/// A single-turn completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fully rendered prompt, sent as one user message
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 1024,
            temperature: 0.0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text completion backend (triplet extraction and answer composition)
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the model's text for `request`
    async fn complete(&self, request: &CompletionRequest) -> ApiResult<String>;

    /// Model identifier, recorded in the index manifest
    fn model_name(&self) -> &str;
}

/// Text embedding backend (records at build time, queries at query time)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> ApiResult<Vec<f32>>;

    /// Embed several texts, one vector per input in the same order
    ///
    /// The default calls [`embed`](Self::embed) sequentially; HTTP providers
    /// override it with a single batched request.
    async fn embed_many(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Model identifier, recorded in the index manifest
    fn model_name(&self) -> &str;

    /// Vector size if known ahead of the first call
    fn dimensions(&self) -> Option<usize> {
        None
    }
}
