//! Prompt templates for triplet extraction and answer composition

mod template;
mod templates;

pub use template::{PromptTemplate, CONTEXT_STR, MAX_TRIPLETS, QUERY_STR, TEXT};
pub use templates::{DEFAULT_EXTRACTION_TEMPLATE, DEFAULT_RESPONSE_TEMPLATE};
