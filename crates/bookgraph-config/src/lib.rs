//! # Bookgraph Configuration
//!
//! Typed configuration for every bookgraph component. Nothing in the workspace
//! reads process-wide settings: a [`Config`] is loaded once by the binary and
//! the relevant section is handed to each component's constructor.
//!
//! ## Sources
//!
//! Values are layered with precedence: defaults < TOML file < environment
//! variables < command-line flags (the last layer is applied by the CLI).
//!
//! ```rust,no_run
//! use bookgraph_config::ConfigLoader;
//!
//! let config = ConfigLoader::load(None)?;
//! println!("chat model: {}", config.chat.model);
//! # Ok::<(), bookgraph_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, EXAMPLE_CONFIG, LOCAL_CONFIG_FILE};

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion model used for triplet extraction and answers
    pub chat: ChatConfig,
    /// Embedding model used for records and queries
    pub embedding: EmbeddingConfig,
    /// Triplet extraction settings
    pub extraction: ExtractionConfig,
    /// Retrieval settings
    pub retrieval: RetrievalConfig,
    /// Retry policy for remote calls
    pub retry: RetryConfig,
    /// Input and index locations
    pub storage: StorageConfig,
    /// Prompt template overrides
    pub prompts: PromptConfig,
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.chat.validate()?;
        self.embedding.validate()?;
        self.extraction.validate()?;
        self.retrieval.validate()?;
        self.retry.validate()?;
        Ok(())
    }

    /// Serialize the effective configuration as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
