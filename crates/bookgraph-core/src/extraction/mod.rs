//! Triplet extraction from record text

mod parser;

pub use parser::{parse_response, parse_triplet_line, ParseError, ParsedResponse, ParsedTriplet};

use std::sync::Arc;

use bookgraph_config::{ExtractionConfig, RetryConfig};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::prompts::{PromptTemplate, MAX_TRIPLETS, TEXT};
use crate::retry::retry_with_backoff;
use crate::traits::{CompletionProvider, CompletionRequest};
use crate::types::{Record, Triplet};

/// Result of extracting one record
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// At least one triplet was parsed
    Extracted {
        triplets: Vec<Triplet>,
        /// Lines that did not parse as triplets
        malformed_lines: usize,
        /// Triplets dropped by the per-record cap
        truncated: usize,
    },
    /// The model answered but nothing parsed
    Empty { malformed_lines: usize },
    /// The model could not be reached after retries
    Failed { error: ApiError },
}

impl ExtractionOutcome {
    pub fn triplets(&self) -> &[Triplet] {
        match self {
            Self::Extracted { triplets, .. } => triplets,
            _ => &[],
        }
    }

    pub fn malformed_lines(&self) -> usize {
        match self {
            Self::Extracted {
                malformed_lines, ..
            }
            | Self::Empty { malformed_lines } => *malformed_lines,
            Self::Failed { .. } => 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Asks a completion model for the facts stated in a record
pub struct TripletExtractor {
    provider: Arc<dyn CompletionProvider>,
    config: ExtractionConfig,
    retry: RetryConfig,
    template: PromptTemplate,
}

impl TripletExtractor {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: ExtractionConfig,
        retry: RetryConfig,
        template: PromptTemplate,
    ) -> Self {
        Self {
            provider,
            config,
            retry,
            template,
        }
    }

    /// Name of the completion model
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Prompt sent for `record`
    pub fn render_prompt(&self, record: &Record) -> String {
        let cap = self.config.max_triplets_per_record.to_string();
        self.template
            .render(&[(TEXT, &record.document_text()), (MAX_TRIPLETS, &cap)])
    }

    /// Extract up to `max_triplets_per_record` triplets from `record`
    ///
    /// Never fails: API errors that survive the retry policy are returned as
    /// [`ExtractionOutcome::Failed`].
    pub async fn extract(&self, record: &Record) -> ExtractionOutcome {
        let request = CompletionRequest::new(self.render_prompt(record))
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);
        let label = format!("extract record {}", record.id);

        let response =
            match retry_with_backoff(&self.retry, &label, || self.provider.complete(&request))
                .await
            {
                Ok(text) => text,
                Err(error) => {
                    warn!("Extraction failed for record {}: {}", record.id, error);
                    return ExtractionOutcome::Failed { error };
                }
            };

        let parsed = parse_response(&response);
        let malformed_lines = parsed.malformed_lines;
        if malformed_lines > 0 {
            debug!(
                "Record {}: skipped {} malformed line(s)",
                record.id, malformed_lines
            );
        }

        if parsed.triplets.is_empty() {
            warn!("No triplets extracted for record {}", record.id);
            return ExtractionOutcome::Empty { malformed_lines };
        }

        let cap = self.config.max_triplets_per_record;
        let truncated = parsed.triplets.len().saturating_sub(cap);
        if truncated > 0 {
            debug!(
                "Record {}: kept first {} triplets, dropped {}",
                record.id, cap, truncated
            );
        }

        let triplets = parsed
            .triplets
            .into_iter()
            .take(cap)
            .map(|t| t.into_triplet(&record.id))
            .collect();

        ExtractionOutcome::Extracted {
            triplets,
            malformed_lines,
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::mocks::ScriptedCompletionProvider;

    fn extractor(provider: Arc<ScriptedCompletionProvider>, cap: usize) -> TripletExtractor {
        TripletExtractor::new(
            provider,
            ExtractionConfig {
                max_triplets_per_record: cap,
                ..Default::default()
            },
            RetryConfig::immediate(3),
            PromptTemplate::default_extraction(),
        )
    }

    #[tokio::test]
    async fn test_extracts_and_attaches_provenance() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.respond_when("SOURCE ID: 1", "(A, KNOWS, B)\nnoise\n(B, KNOWS, C)");
        let record = Record::new("1", "T", "A knows B.");

        let outcome = extractor(provider.clone(), 10).extract(&record).await;

        assert_eq!(
            outcome.triplets(),
            &[
                Triplet::new("A", "KNOWS", "B", "1"),
                Triplet::new("B", "KNOWS", "C", "1"),
            ]
        );
        assert_eq!(outcome.malformed_lines(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_text_and_cap() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        let record = Record::new("9", "Emma", "Matchmaking.");
        let prompt = extractor(provider, 7).render_prompt(&record);

        assert!(prompt.contains("BOOK TITLE: Emma\nSOURCE ID: 9\nSUMMARY:\nMatchmaking."));
        assert!(prompt.contains("at most 7 triplets"));
    }

    #[tokio::test]
    async fn test_cap_keeps_first_triplets() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.respond_when("SOURCE ID: 1", "(A, R, B)\n(C, R, D)\n(E, R, F)");
        let record = Record::new("1", "T", "");

        let outcome = extractor(provider, 2).extract(&record).await;

        match outcome {
            ExtractionOutcome::Extracted {
                triplets,
                truncated,
                ..
            } => {
                assert_eq!(triplets.len(), 2);
                assert_eq!(triplets[1].subject, "C");
                assert_eq!(truncated, 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_response() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.respond_when("SOURCE ID: 1", "I could not find any relationships.");
        let outcome = extractor(provider, 10)
            .extract(&Record::new("1", "T", ""))
            .await;
        assert_eq!(outcome, ExtractionOutcome::Empty { malformed_lines: 1 });
    }

    #[tokio::test]
    async fn test_retries_then_reports_failure() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.fail_when("SOURCE ID: 2", ApiError::http(503, "overloaded"));

        let outcome = extractor(provider.clone(), 10)
            .extract(&Record::new("2", "T", ""))
            .await;

        assert!(outcome.is_failed());
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_transient_failure_recovers() {
        let provider = Arc::new(ScriptedCompletionProvider::new());
        provider.fail_next(1, ApiError::transport("reset"));
        provider.respond_when("SOURCE ID: 1", "(A, R, B)");

        let outcome = extractor(provider.clone(), 10)
            .extract(&Record::new("1", "T", ""))
            .await;

        assert_eq!(outcome.triplets().len(), 1);
        assert_eq!(provider.call_count(), 2);
    }
}
