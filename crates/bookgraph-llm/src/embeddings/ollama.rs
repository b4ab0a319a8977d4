//! Ollama embedding provider (`/api/embed`, batched)

use async_trait::async_trait;
use bookgraph_core::{ApiError, ApiResult, EmbeddingProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ProviderResult;
use crate::http::{build_client, check_status, decode, transport_error};

const PROVIDER: &str = "Ollama";

#[derive(Debug, Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama embedding provider
pub struct OllamaEmbeddingProvider {
    client: Client,
    endpoint: String,
    model: String,
    expected_dimensions: Option<usize>,
}

impl OllamaEmbeddingProvider {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        expected_dimensions: Option<usize>,
        timeout_secs: u64,
    ) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            expected_dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> ApiResult<Vec<f32>> {
        let mut vectors = self.embed_many(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| ApiError::transport("Empty embedding response"))
    }

    async fn embed_many(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.endpoint);
        tracing::debug!("Sending embedding request to {} for {} texts", url, texts.len());

        let response = self
            .client
            .post(&url)
            .json(&OllamaEmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let response = check_status(PROVIDER, response).await?;
        let body: OllamaEmbedResponse = decode(PROVIDER, response).await?;

        if body.embeddings.len() != texts.len() {
            return Err(ApiError::transport(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                body.embeddings.len()
            )));
        }
        if let Some(expected) = self.expected_dimensions {
            if let Some(vector) = body.embeddings.iter().find(|v| v.len() != expected) {
                return Err(ApiError::transport(format!(
                    "Model {} returned {}-dimensional embeddings, expected {}",
                    self.model,
                    vector.len(),
                    expected
                )));
            }
        }
        tracing::debug!(
            "Received {} embeddings with {} dimensions",
            body.embeddings.len(),
            body.embeddings.first().map(Vec::len).unwrap_or(0)
        );
        Ok(body.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        self.expected_dimensions
    }
}
