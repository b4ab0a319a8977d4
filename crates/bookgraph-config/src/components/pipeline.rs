//! Extraction and retrieval settings

use super::chat::validate_temperature;
use super::defaults::*;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Triplet extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Triplets kept per record; extra lines are dropped in response order
    pub max_triplets_per_record: usize,
    /// Completion budget for one extraction call
    pub max_tokens: u32,
    /// Sampling temperature for extraction
    pub temperature: f32,
    /// Extraction requests in flight during a build
    pub concurrency: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_triplets_per_record: DEFAULT_MAX_TRIPLETS_PER_RECORD,
            max_tokens: DEFAULT_EXTRACTION_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            concurrency: DEFAULT_EXTRACTION_CONCURRENCY,
        }
    }
}

impl ExtractionConfig {
    /// Check ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_triplets_per_record == 0 {
            return Err(ConfigError::invalid(
                "extraction.max_triplets_per_record",
                "must be greater than 0",
            ));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("extraction.max_tokens", "must be greater than 0"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::invalid("extraction.concurrency", "must be greater than 0"));
        }
        validate_temperature("extraction.temperature", self.temperature)
    }
}

/// Query-time retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Records matched by vector similarity
    pub top_k: usize,
    /// Graph expansion depth around each matched record's entities
    pub max_hops: usize,
    /// Budget for the rendered context block
    pub max_context_chars: usize,
    /// Append records that share entities with the expanded neighbourhood
    pub expand_related_records: bool,
    /// Cap on appended related records
    pub max_related_records: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_hops: DEFAULT_MAX_HOPS,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            expand_related_records: false,
            max_related_records: DEFAULT_MAX_RELATED_RECORDS,
        }
    }
}

impl RetrievalConfig {
    /// Check ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_k == 0 {
            return Err(ConfigError::invalid("retrieval.top_k", "must be greater than 0"));
        }
        if self.max_context_chars == 0 {
            return Err(ConfigError::invalid(
                "retrieval.max_context_chars",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}
