//! Build providers from configuration

use std::sync::Arc;

use bookgraph_config::{ChatConfig, EmbeddingConfig, EmbeddingProviderType, LlmProviderType};
use bookgraph_core::{CompletionProvider, EmbeddingProvider};
use tracing::info;

use crate::chat::{OllamaChatProvider, OpenAIChatProvider};
use crate::embeddings::{HashingEmbeddingProvider, OllamaEmbeddingProvider, OpenAIEmbeddingProvider};
use crate::error::{ProviderError, ProviderResult};

/// Create a completion provider from the `[chat]` section
///
/// Fails when the provider needs an API key and none is configured.
pub fn create_completion_provider(
    config: &ChatConfig,
) -> ProviderResult<Arc<dyn CompletionProvider>> {
    let endpoint = config.llm_endpoint();
    info!(
        "Using {} chat model {} at {}",
        config.provider.as_str(),
        config.model,
        endpoint
    );
    match config.provider {
        LlmProviderType::OpenAI => {
            let api_key = config.resolve_api_key()?;
            Ok(Arc::new(OpenAIChatProvider::new(
                api_key,
                endpoint,
                config.model.clone(),
                config.timeout_secs,
            )?))
        }
        LlmProviderType::Ollama => Ok(Arc::new(OllamaChatProvider::new(
            endpoint,
            config.model.clone(),
            config.timeout_secs,
        )?)),
    }
}

/// Create an embedding provider from the `[embedding]` section
pub fn create_embedding_provider(
    config: &EmbeddingConfig,
) -> ProviderResult<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        EmbeddingProviderType::Mock => {
            let dimensions = config.dimensions.ok_or_else(|| {
                ProviderError::Invalid("the mock embedder needs `dimensions`".to_string())
            })?;
            info!("Using offline hashing embedder ({} dimensions)", dimensions);
            Ok(Arc::new(HashingEmbeddingProvider::new(dimensions)))
        }
        EmbeddingProviderType::Ollama => {
            let endpoint = remote_endpoint(config)?;
            info!("Using Ollama embedding model {} at {}", config.model, endpoint);
            Ok(Arc::new(OllamaEmbeddingProvider::new(
                endpoint,
                config.model.clone(),
                config.dimensions,
                config.timeout_secs,
            )?))
        }
        EmbeddingProviderType::OpenAI => {
            let endpoint = remote_endpoint(config)?;
            let api_key = config.resolve_api_key()?.ok_or_else(|| {
                ProviderError::Invalid("OpenAI embeddings need an API key".to_string())
            })?;
            info!("Using OpenAI embedding model {} at {}", config.model, endpoint);
            Ok(Arc::new(OpenAIEmbeddingProvider::new(
                api_key,
                endpoint,
                config.model.clone(),
                config.dimensions,
                config.timeout_secs,
            )?))
        }
    }
}

fn remote_endpoint(config: &EmbeddingConfig) -> ProviderResult<String> {
    config.api_url().ok_or_else(|| {
        ProviderError::Invalid(format!(
            "no endpoint for embedding provider {}",
            config.provider.as_str()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookgraph_config::ConfigError;
    use serial_test::serial;

    #[test]
    fn test_mock_embedder_from_config() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderType::Mock,
            dimensions: Some(32),
            ..Default::default()
        };
        let provider = create_embedding_provider(&config).unwrap();
        assert_eq!(provider.dimensions(), Some(32));
    }

    #[test]
    fn test_ollama_needs_no_key() {
        let config = ChatConfig {
            provider: LlmProviderType::Ollama,
            model: "llama3".to_string(),
            ..Default::default()
        };
        let provider = create_completion_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "llama3");
    }

    #[test]
    #[serial]
    fn test_missing_chat_key() {
        let config = ChatConfig {
            api_key_env: "BOOKGRAPH_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        std::env::remove_var("BOOKGRAPH_TEST_UNSET_KEY");
        let err = create_completion_provider(&config).err().unwrap();
        assert!(matches!(
            err,
            ProviderError::Config(ConfigError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn test_inline_key_is_used() {
        let config = ChatConfig {
            api_key: Some("sk-inline".to_string()),
            ..Default::default()
        };
        assert!(create_completion_provider(&config).is_ok());
    }
}
