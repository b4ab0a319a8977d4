//! Prompt template overrides
//!
//! A deployment runs with exactly one extraction template and one response
//! template. Each can be given inline or as a file; when neither is set the
//! built-in template from `bookgraph-core` is used.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prompt template overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Inline extraction template (`{text}`, `{max_knowledge_triplets}`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_template: Option<String>,
    /// File holding the extraction template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_template_file: Option<PathBuf>,
    /// Inline response template (`{context_str}`, `{query_str}`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_template: Option<String>,
    /// File holding the response template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_template_file: Option<PathBuf>,
}

impl PromptConfig {
    /// Extraction template override, if any
    pub fn extraction_override(&self) -> ConfigResult<Option<String>> {
        pick(
            "prompts.extraction_template",
            self.extraction_template.as_deref(),
            self.extraction_template_file.as_deref(),
        )
    }

    /// Response template override, if any
    pub fn response_override(&self) -> ConfigResult<Option<String>> {
        pick(
            "prompts.response_template",
            self.response_template.as_deref(),
            self.response_template_file.as_deref(),
        )
    }
}

fn pick(field: &str, inline: Option<&str>, file: Option<&Path>) -> ConfigResult<Option<String>> {
    match (inline, file) {
        (Some(_), Some(_)) => Err(ConfigError::invalid(
            field,
            "set either the inline template or the template file, not both",
        )),
        (Some(text), None) => Ok(Some(text.to_string())),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map(Some)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        (None, None) => Ok(None),
    }
}
