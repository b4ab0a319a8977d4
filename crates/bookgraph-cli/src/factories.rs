//! Assembles core components from configuration
//!
//! This is the composition root: concrete providers are created here and
//! handed to `bookgraph-core` as trait objects.

use std::sync::Arc;

use anyhow::{Context, Result};
use bookgraph_config::Config;
use bookgraph_core::{
    BuildSettings, ComposeOptions, EmbeddingProvider, GraphIndex, IndexBuilder, PromptTemplate,
    QueryEngine, ResponseComposer, Retriever, TripletExtractor,
};
use bookgraph_llm::{create_completion_provider, create_embedding_provider};

/// Extraction template from `[prompts]`, else the built-in one
pub fn extraction_template(config: &Config) -> Result<PromptTemplate> {
    match config.prompts.extraction_override()? {
        Some(text) => PromptTemplate::extraction(text).context("Invalid extraction template"),
        None => Ok(PromptTemplate::default_extraction()),
    }
}

/// Response template from `[prompts]`, else the built-in one
pub fn response_template(config: &Config) -> Result<PromptTemplate> {
    match config.prompts.response_override()? {
        Some(text) => PromptTemplate::response(text).context("Invalid response template"),
        None => Ok(PromptTemplate::default_response()),
    }
}

pub fn create_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    create_embedding_provider(&config.embedding).context("Failed to create embedding provider")
}

pub fn create_index_builder(config: &Config) -> Result<IndexBuilder> {
    let completion =
        create_completion_provider(&config.chat).context("Failed to create chat provider")?;
    let extractor = TripletExtractor::new(
        completion,
        config.extraction.clone(),
        config.retry.clone(),
        extraction_template(config)?,
    );
    let settings = BuildSettings::from_config(&config.extraction, &config.embedding, &config.retry);
    Ok(IndexBuilder::new(extractor, create_embedder(config)?, settings))
}

/// Query engine over a loaded index, reusing `embedder` for questions
pub fn create_query_engine(
    config: &Config,
    index: Arc<GraphIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<QueryEngine> {
    let completion =
        create_completion_provider(&config.chat).context("Failed to create chat provider")?;
    let retriever = Retriever::new(embedder, config.retrieval.clone(), config.retry.clone());
    let composer = ResponseComposer::new(
        completion,
        ComposeOptions::from_config(&config.chat, &config.retrieval),
        config.retry.clone(),
        response_template(config)?,
    );
    Ok(QueryEngine::new(index, retriever, composer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_templates_by_default() {
        let config = Config::default();
        assert_eq!(
            extraction_template(&config).unwrap(),
            PromptTemplate::default_extraction()
        );
        assert_eq!(
            response_template(&config).unwrap(),
            PromptTemplate::default_response()
        );
    }

    #[test]
    fn test_response_template_file_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Books:\n{{context_str}}\nQ: {{query_str}}").unwrap();

        let mut config = Config::default();
        config.prompts.response_template_file = Some(file.path().to_path_buf());

        let template = response_template(&config).unwrap();
        assert!(template.as_str().starts_with("Books:"));
    }

    #[test]
    fn test_template_missing_placeholder_is_rejected() {
        let mut config = Config::default();
        config.prompts.extraction_template = Some("no placeholders here".to_string());
        assert!(extraction_template(&config).is_err());
    }
}
