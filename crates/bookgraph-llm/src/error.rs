use bookgraph_config::ConfigError;
use thiserror::Error;

/// Errors raised while constructing a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid provider configuration: {0}")]
    Invalid(String),
}

/// Result type for provider construction
pub type ProviderResult<T> = Result<T, ProviderError>;
