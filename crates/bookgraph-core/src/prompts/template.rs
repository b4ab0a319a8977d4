use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::templates::{DEFAULT_EXTRACTION_TEMPLATE, DEFAULT_RESPONSE_TEMPLATE};
use crate::error::{BookgraphError, BookgraphResult};

/// Record text placeholder of the extraction template
pub const TEXT: &str = "text";
/// Triplet cap placeholder of the extraction template
pub const MAX_TRIPLETS: &str = "max_knowledge_triplets";
/// Retrieved context placeholder of the response template
pub const CONTEXT_STR: &str = "context_str";
/// User question placeholder of the response template
pub const QUERY_STR: &str = "query_str";

// `{{` and `}}` are literal braces, `{name}` is a placeholder
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Text with `{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    /// Build a template, failing if any of `required` is absent
    pub fn new(text: impl Into<String>, required: &[&str]) -> BookgraphResult<Self> {
        let template = Self { text: text.into() };
        let present = template.placeholders();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| !present.contains(*name))
            .collect();
        if !missing.is_empty() {
            return Err(BookgraphError::Template(format!(
                "missing placeholder(s): {}",
                missing
                    .iter()
                    .map(|name| format!("{{{}}}", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        Ok(template)
    }

    /// Extraction template; must contain `{text}`
    pub fn extraction(text: impl Into<String>) -> BookgraphResult<Self> {
        Self::new(text, &[TEXT])
    }

    /// Response template; must contain `{context_str}` and `{query_str}`
    pub fn response(text: impl Into<String>) -> BookgraphResult<Self> {
        Self::new(text, &[CONTEXT_STR, QUERY_STR])
    }

    pub fn default_extraction() -> Self {
        Self {
            text: DEFAULT_EXTRACTION_TEMPLATE.to_string(),
        }
    }

    pub fn default_response() -> Self {
        Self {
            text: DEFAULT_RESPONSE_TEMPLATE.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Names of the placeholders the template uses
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER_RE
            .captures_iter(&self.text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Substitute `values`; unknown placeholders are left as written
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.text, |caps: &Captures| match caps.get(1) {
                Some(name) => values
                    .iter()
                    .find(|(key, _)| *key == name.as_str())
                    .map(|(_, value)| (*value).to_string())
                    .unwrap_or_else(|| caps[0].to_string()),
                None => caps[0][..1].to_string(),
            })
            .into_owned()
    }
}
