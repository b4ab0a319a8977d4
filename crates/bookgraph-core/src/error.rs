//! Error taxonomy for building and querying a graph index

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a remote completion or embedding API
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", describe(.status, .message))]
pub struct ApiError {
    /// HTTP status, `None` for transport failures (connect, timeout, decode)
    pub status: Option<u16>,
    /// Provider message or transport error text
    pub message: String,
}

fn describe(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("API error (HTTP {}): {}", code, message),
        None => format!("API transport error: {}", message),
    }
}

impl ApiError {
    /// Error carrying an HTTP status
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Transport-level error (no response received)
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Check if the error is retryable
    ///
    /// Transport failures, timeouts, rate limits and server errors are;
    /// authentication and request errors are not.
    pub fn is_retryable(&self) -> bool {
        match self.status {
            None => true,
            Some(408) | Some(429) => true,
            Some(code) => (500..600).contains(&code),
        }
    }
}

/// Result type for remote provider calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised by bookgraph operations
#[derive(Error, Debug)]
pub enum BookgraphError {
    /// A CSV row is missing a required field or has an empty id
    #[error("Malformed input at row {row}: {message}")]
    MalformedInput {
        /// 1-based data row (0 for the header)
        row: usize,
        /// What was wrong
        message: String,
    },

    /// Two records share an id
    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    /// A remote call failed after retries
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Query against an index with no records
    #[error("The graph index contains no records")]
    EmptyIndex,

    /// Persisted index is missing files or violates an invariant
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// Answer generation failed after retries
    #[error("Failed to compose a response: {0}")]
    Composition(#[source] ApiError),

    /// Vectors of different sizes were mixed
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the index
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },

    /// A prompt template is missing a placeholder
    #[error("Invalid prompt template: {0}")]
    Template(String),

    /// Configuration problem surfaced while wiring components
    #[error(transparent)]
    Config(#[from] bookgraph_config::ConfigError),

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for bookgraph operations
pub type BookgraphResult<T> = Result<T, BookgraphError>;

impl BookgraphError {
    /// Create a corrupt index error
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        Self::CorruptIndex(msg.into())
    }

    /// Whether this failure should abort a build rather than degrade it
    pub fn is_fatal_for_build(&self) -> bool {
        !matches!(self, Self::Api(_) | Self::DimensionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_retryable() {
        assert!(ApiError::transport("connection reset").is_retryable());
        assert!(ApiError::http(429, "slow down").is_retryable());
        assert!(ApiError::http(503, "unavailable").is_retryable());
        assert!(ApiError::http(408, "timeout").is_retryable());
        assert!(!ApiError::http(401, "bad key").is_retryable());
        assert!(!ApiError::http(400, "bad request").is_retryable());
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::http(500, "boom").to_string(),
            "API error (HTTP 500): boom"
        );
        assert_eq!(
            ApiError::transport("timed out").to_string(),
            "API transport error: timed out"
        );
    }

    #[test]
    fn test_build_fatality() {
        assert!(BookgraphError::DuplicateId("1".into()).is_fatal_for_build());
        assert!(!BookgraphError::Api(ApiError::transport("x")).is_fatal_for_build());
    }
}
