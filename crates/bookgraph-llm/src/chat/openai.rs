//! OpenAI-compatible chat provider implementation
//!
//! Works against any server exposing `POST {base}/chat/completions` with the
//! OpenAI request shape, DeepSeek included.

use async_trait::async_trait;
use bookgraph_core::{ApiError, ApiResult, CompletionProvider, CompletionRequest};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::ProviderResult;
use crate::http::{build_client, check_status, decode, transport_error};

const PROVIDER: &str = "OpenAI";

/// OpenAI-compatible chat provider
pub struct OpenAIChatProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAIChatProvider {
    /// Create a new provider; `base_url` is used as given, without `/v1`
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAIChatProvider {
    async fn complete(&self, request: &CompletionRequest) -> ApiResult<String> {
        let api_request = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": request.prompt },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "stream": false,
        });

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} ({} prompt chars)", url, request.prompt.len());

        let mut builder = self.client.post(&url).json(&api_request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let response = check_status(PROVIDER, response).await?;
        let openai_response: OpenAIResponse = decode(PROVIDER, response).await?;

        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::transport("No choices in response"))?;

        if let Some(usage) = openai_response.usage {
            debug!(
                "{} tokens used ({} prompt, {} completion)",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }
        Ok(choice.message.content.unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// OpenAI API response types
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAIChatProvider::new(
            Some("sk-test-key".to_string()),
            "https://api.deepseek.com/",
            "deepseek-chat",
            60,
        )
        .unwrap();

        assert_eq!(provider.model_name(), "deepseek-chat");
        assert_eq!(provider.base_url, "https://api.deepseek.com");
    }
}
