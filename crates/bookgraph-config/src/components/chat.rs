//! Completion model configuration

use super::defaults::*;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Completion backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Any OpenAI-compatible `/chat/completions` API (DeepSeek, OpenAI, vLLM, ...)
    #[default]
    OpenAI,
    /// Ollama `/api/chat`
    Ollama,
}

impl LlmProviderType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Ollama => "ollama",
        }
    }

    /// Whether requests must carry a bearer token
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI)
    }
}

/// Completion model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Backend type
    pub provider: LlmProviderType,
    /// API base URL; provider default when unset
    pub endpoint: Option<String>,
    /// Model name
    pub model: String,
    /// Inline API key (takes precedence over `api_key_env`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable consulted for the API key
    pub api_key_env: String,
    /// Maximum tokens in a composed answer
    pub max_tokens: u32,
    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            endpoint: None,
            model: DEFAULT_CHAT_MODEL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_CHAT_API_KEY_ENV.to_string(),
            max_tokens: DEFAULT_CHAT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
        }
    }
}

impl ChatConfig {
    /// Get the LLM endpoint, using provider-specific default if not specified
    pub fn llm_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| match self.provider {
                LlmProviderType::OpenAI => DEFAULT_CHAT_ENDPOINT.to_string(),
                LlmProviderType::Ollama => "http://localhost:11434".to_string(),
            })
            .trim_end_matches('/')
            .to_string()
    }

    /// Resolve the API key from the inline value or the environment.
    ///
    /// Returns `Ok(None)` for providers that do not authenticate.
    pub fn resolve_api_key(&self) -> ConfigResult<Option<String>> {
        if !self.provider.requires_api_key() {
            return Ok(None);
        }
        resolve_key(self.api_key.as_deref(), &self.api_key_env, "chat").map(Some)
    }

    /// Check ranges and required fields
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("chat.model", "must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("chat.max_tokens", "must be greater than 0"));
        }
        validate_temperature("chat.temperature", self.temperature)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("chat.timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }
}

pub(crate) fn resolve_key(inline: Option<&str>, env_var: &str, section: &str) -> ConfigResult<String> {
    if let Some(key) = inline.filter(|k| !k.trim().is_empty()) {
        return Ok(key.to_string());
    }
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey {
            section: section.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

pub(crate) fn validate_temperature(field: &str, value: f32) -> ConfigResult<()> {
    if !(0.0..=2.0).contains(&value) {
        return Err(ConfigError::invalid(field, format!("{} is outside 0.0-2.0", value)));
    }
    Ok(())
}
