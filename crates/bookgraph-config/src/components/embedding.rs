//! Embedding model configuration

use super::chat::resolve_key;
use super::defaults::*;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Embedding provider type - enum for TOML serialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// Ollama provider (local or remote), serves `bge-m3`
    #[default]
    Ollama,
    /// OpenAI-compatible `/embeddings` API
    OpenAI,
    /// Deterministic offline provider for testing and demos
    Mock,
}

impl EmbeddingProviderType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Mock => "mock",
        }
    }

    /// Get default endpoint for this provider
    pub fn default_endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => Some("http://localhost:11434"),
            Self::OpenAI => Some("https://api.openai.com/v1"),
            Self::Mock => None,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider type (ollama, openai, mock)
    pub provider: EmbeddingProviderType,
    /// Custom API endpoint (remote providers only)
    pub endpoint: Option<String>,
    /// Model name
    pub model: String,
    /// Expected vector dimension; responses of another size are rejected
    pub dimensions: Option<usize>,
    /// Inline API key (OpenAI provider)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted for the API key (OpenAI provider)
    pub api_key_env: String,
    /// Texts per embedding request
    pub batch_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::default(),
            endpoint: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: Some(DEFAULT_EMBEDDING_DIMENSIONS),
            api_key: None,
            api_key_env: DEFAULT_EMBEDDING_API_KEY_ENV.to_string(),
            batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            timeout_secs: DEFAULT_EMBEDDING_TIMEOUT_SECS,
        }
    }
}

impl EmbeddingConfig {
    /// Get API URL for remote providers
    pub fn api_url(&self) -> Option<String> {
        self.endpoint
            .as_deref()
            .or_else(|| self.provider.default_endpoint())
            .map(|url| url.trim_end_matches('/').to_string())
    }

    /// Resolve the API key; only the OpenAI provider needs one
    pub fn resolve_api_key(&self) -> ConfigResult<Option<String>> {
        match self.provider {
            EmbeddingProviderType::OpenAI => {
                resolve_key(self.api_key.as_deref(), &self.api_key_env, "embedding").map(Some)
            }
            EmbeddingProviderType::Ollama | EmbeddingProviderType::Mock => Ok(None),
        }
    }

    /// Check ranges and required fields
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("embedding.model", "must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("embedding.batch_size", "must be greater than 0"));
        }
        if self.dimensions == Some(0) {
            return Err(ConfigError::invalid("embedding.dimensions", "must be greater than 0"));
        }
        if self.provider == EmbeddingProviderType::Mock && self.dimensions.is_none() {
            return Err(ConfigError::invalid(
                "embedding.dimensions",
                "the mock provider needs an explicit dimension",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("embedding.timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }
}
