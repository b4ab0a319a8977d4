//! Answer generation from a retrieved context

use std::sync::Arc;

use bookgraph_config::{ChatConfig, RetrievalConfig, RetryConfig};
use tracing::{debug, info};

use crate::error::{BookgraphError, BookgraphResult};
use crate::prompts::{PromptTemplate, CONTEXT_STR, QUERY_STR};
use crate::retry::retry_with_backoff;
use crate::traits::{CompletionProvider, CompletionRequest};
use crate::types::ContextBundle;

const EMPTY_CONTEXT: &str = "(no matching records)";
const TRIPLETS_HEADING: &str = "Knowledge graph relationships:";

/// Generation settings for answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Upper bound on the rendered context, in characters
    pub max_context_chars: usize,
}

impl ComposeOptions {
    pub fn from_config(chat: &ChatConfig, retrieval: &RetrievalConfig) -> Self {
        Self {
            max_tokens: chat.max_tokens,
            temperature: chat.temperature,
            max_context_chars: retrieval.max_context_chars,
        }
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default(), &RetrievalConfig::default())
    }
}

/// Turns a question and its context into the model's answer
pub struct ResponseComposer {
    provider: Arc<dyn CompletionProvider>,
    options: ComposeOptions,
    retry: RetryConfig,
    template: PromptTemplate,
}

impl ResponseComposer {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        options: ComposeOptions,
        retry: RetryConfig,
        template: PromptTemplate,
    ) -> Self {
        Self {
            provider,
            options,
            retry,
            template,
        }
    }

    /// Full prompt for `query` over `bundle`
    pub fn render_prompt(&self, query: &str, bundle: &ContextBundle) -> String {
        let context = render_context(bundle, self.options.max_context_chars);
        self.template
            .render(&[(CONTEXT_STR, &context), (QUERY_STR, query)])
    }

    /// Ask the model once (with retries) and return its text unchanged
    pub async fn compose(&self, query: &str, bundle: &ContextBundle) -> BookgraphResult<String> {
        let request = CompletionRequest::new(self.render_prompt(query, bundle))
            .with_max_tokens(self.options.max_tokens)
            .with_temperature(self.options.temperature);
        debug!("Composing answer from {} chars of prompt", request.prompt.len());

        let answer = retry_with_backoff(&self.retry, "compose answer", || {
            self.provider.complete(&request)
        })
        .await
        .map_err(BookgraphError::Composition)?;

        info!("Composed answer ({} chars)", answer.chars().count());
        Ok(answer)
    }
}

/// Serialize records then triplets, stopping at `max_chars` characters
///
/// The entry that crosses the limit is cut on a character boundary; later
/// entries are dropped.
pub fn render_context(bundle: &ContextBundle, max_chars: usize) -> String {
    if bundle.is_empty() {
        return EMPTY_CONTEXT.to_string();
    }

    // (separator, text); records are blank-line separated, triplets one per line
    let mut sections: Vec<(&str, String)> = bundle
        .records
        .iter()
        .map(|record| ("\n\n", record.document_text()))
        .collect();
    if !bundle.triplets.is_empty() {
        sections.push(("\n\n", TRIPLETS_HEADING.to_string()));
        sections.extend(
            bundle
                .triplets
                .iter()
                .map(|t| ("\n", format!("{} [Source ID: {}]", t, t.source_record_id))),
        );
    }

    let mut context = String::new();
    let mut used = 0;
    for (position, (separator, section)) in sections.iter().enumerate() {
        let separator = if position == 0 { "" } else { *separator };
        let needed = separator.chars().count() + section.chars().count();
        if used + needed <= max_chars {
            context.push_str(separator);
            context.push_str(section);
            used += needed;
            continue;
        }

        let remaining = max_chars.saturating_sub(used + separator.chars().count());
        if remaining > 0 {
            context.push_str(separator);
            context.extend(section.chars().take(remaining));
        }
        debug!(
            "Context truncated at {} chars, {} of {} entries kept in full",
            max_chars,
            position,
            sections.len()
        );
        break;
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::test_support::mocks::ScriptedCompletionProvider;
    use crate::types::{Record, Triplet};

    fn bundle() -> ContextBundle {
        ContextBundle {
            records: vec![Record::new("1", "Dune", "Sand.")],
            triplets: vec![Triplet::new("Paul", "LIVES_ON", "Arrakis", "1")],
        }
    }

    fn composer(provider: Arc<ScriptedCompletionProvider>) -> ResponseComposer {
        ResponseComposer::new(
            provider,
            ComposeOptions::default(),
            RetryConfig::immediate(2),
            PromptTemplate::default_response(),
        )
    }

    #[test]
    fn test_render_context_layout() {
        assert_eq!(
            render_context(&bundle(), 10_000),
            "BOOK TITLE: Dune\nSOURCE ID: 1\nSUMMARY:\nSand.\n\n\
             Knowledge graph relationships:\n\
             (Paul, LIVES_ON, Arrakis) [Source ID: 1]"
        );
    }

    #[test]
    fn test_render_context_budget() {
        let context = render_context(&bundle(), 20);
        assert_eq!(context.chars().count(), 20);
        assert!(context.starts_with("BOOK TITLE: Dune"));
    }

    #[test]
    fn test_render_context_cuts_on_char_boundary() {
        let bundle = ContextBundle {
            records: vec![Record::new("1", "三体", "宇宙社会学")],
            triplets: vec![],
        };
        let context = render_context(&bundle, 14);
        assert_eq!(context, "BOOK TITLE: 三体");
    }

    #[test]
    fn test_empty_bundle() {
        assert_eq!(render_context(&ContextBundle::default(), 100), EMPTY_CONTEXT);
    }

    #[tokio::test]
    async fn test_compose_returns_raw_completion() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.respond_when("---User Query---\nsand books", "Title: 《Dune》");

        let answer = composer(provider.clone())
            .compose("sand books", &bundle())
            .await
            .unwrap();

        assert_eq!(answer, "Title: 《Dune》");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.requests()[0].prompt.contains("(Paul, LIVES_ON, Arrakis)"));
    }

    #[tokio::test]
    async fn test_compose_failure_is_composition_error() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.fail_when("---User Query---", ApiError::http(502, "bad gateway"));

        let err = composer(provider.clone())
            .compose("anything", &bundle())
            .await
            .unwrap_err();

        assert!(matches!(err, BookgraphError::Composition(ApiError { status: Some(502), .. })));
        assert_eq!(provider.call_count(), 2);
    }
}
