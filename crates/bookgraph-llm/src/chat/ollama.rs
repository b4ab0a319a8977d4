//! Ollama chat provider implementation

use async_trait::async_trait;
use bookgraph_core::{ApiResult, CompletionProvider, CompletionRequest};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::{build_client, check_status, decode, transport_error};

const PROVIDER: &str = "Ollama";

/// Ollama chat provider
pub struct OllamaChatProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaChatProvider {
    /// Create a new Ollama provider
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OllamaChatProvider {
    async fn complete(&self, request: &CompletionRequest) -> ApiResult<String> {
        let api_request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": request.prompt },
            ],
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            },
        });

        let url = format!("{}/api/chat", self.base_url);
        debug!("POST {} ({} prompt chars)", url, request.prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&api_request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let response = check_status(PROVIDER, response).await?;
        let ollama_response: OllamaChatResponse = decode(PROVIDER, response).await?;

        Ok(ollama_response.message.content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}
