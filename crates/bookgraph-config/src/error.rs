//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::Config`]
    #[error("Failed to parse config file {path}: {message}")]
    Parse {
        /// File that was being parsed
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Dotted field name, e.g. `retrieval.top_k`
        field: String,
        /// Explanation of what was wrong
        value: String,
    },

    /// A provider needs an API key and none was configured
    #[error("API key missing: set {env_var} or provide api_key in the [{section}] section")]
    MissingApiKey {
        /// Config section that needs the key
        section: String,
        /// Environment variable that was consulted
        env_var: String,
    },

    /// Serialization back to TOML failed
    #[error("Failed to serialize config: {0}")]
    Serialize(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn invalid(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}
