//! Mock Implementations for Testing
//!
//! Deterministic, in-memory providers with call tracking and error injection.
//!
//! # Examples
//!
//! ```rust
//! use bookgraph_core::test_support::mocks::ScriptedCompletionProvider;
//! use bookgraph_core::traits::{CompletionProvider, CompletionRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ScriptedCompletionProvider::new();
//! provider.respond_when("SOURCE ID: 1", "(A, KNOWS, B)");
//!
//! let reply = provider
//!     .complete(&CompletionRequest::new("BOOK TITLE: T\nSOURCE ID: 1\n"))
//!     .await?;
//! assert_eq!(reply, "(A, KNOWS, B)");
//! assert_eq!(provider.call_count(), 1);
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ApiError, ApiResult};
use crate::traits::{CompletionProvider, CompletionRequest, EmbeddingProvider};

// ============================================================================
// Completion
// ============================================================================

struct Rule {
    needle: String,
    reply: ApiResult<String>,
}

#[derive(Default)]
struct CompletionState {
    rules: Vec<Rule>,
    pending_failures: VecDeque<ApiError>,
    default_reply: String,
    requests: Vec<CompletionRequest>,
}

/// Completion provider answering from a script
///
/// Each call first consumes a queued failure (see [`fail_next`]), then the
/// first rule whose needle occurs in the prompt, then the default reply.
///
/// [`fail_next`]: ScriptedCompletionProvider::fail_next
#[derive(Default)]
pub struct ScriptedCompletionProvider {
    state: Mutex<CompletionState>,
}

impl ScriptedCompletionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used when no rule matches (empty by default)
    pub fn with_default_reply(self, reply: impl Into<String>) -> Self {
        self.state.lock().unwrap().default_reply = reply.into();
        self
    }

    /// Answer `reply` to prompts containing `needle`
    pub fn respond_when(&self, needle: impl Into<String>, reply: impl Into<String>) {
        self.state.lock().unwrap().rules.push(Rule {
            needle: needle.into(),
            reply: Ok(reply.into()),
        });
    }

    /// Fail every prompt containing `needle`
    pub fn fail_when(&self, needle: impl Into<String>, error: ApiError) {
        self.state.lock().unwrap().rules.push(Rule {
            needle: needle.into(),
            reply: Err(error),
        });
    }

    /// Fail the next `count` calls regardless of prompt
    pub fn fail_next(&self, count: usize, error: ApiError) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..count {
            state.pending_failures.push_back(error.clone());
        }
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Every request received, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of calls whose prompt contained `needle`
    pub fn calls_matching(&self, needle: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.prompt.contains(needle))
            .count()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> ApiResult<String> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if let Some(error) = state.pending_failures.pop_front() {
            return Err(error);
        }

        state
            .rules
            .iter()
            .find(|rule| request.prompt.contains(&rule.needle))
            .map(|rule| rule.reply.clone())
            .unwrap_or_else(|| Ok(state.default_reply.clone()))
    }

    fn model_name(&self) -> &str {
        "scripted-completion"
    }
}

// ============================================================================
// Embeddings
// ============================================================================

#[derive(Default)]
struct EmbeddingState {
    failing_needles: Vec<String>,
    fail_batches: bool,
    embed_calls: usize,
    batch_calls: usize,
}

/// Bag-of-words embedder over a fixed vocabulary
///
/// Component `i` counts case-insensitive whole-word occurrences of
/// `vocabulary[i]`, so texts sharing keywords have a high cosine similarity
/// and texts sharing none score zero.
pub struct KeywordEmbeddingProvider {
    vocabulary: Vec<String>,
    state: Mutex<EmbeddingState>,
}

impl KeywordEmbeddingProvider {
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Self {
        Self {
            vocabulary: vocabulary
                .iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            state: Mutex::new(EmbeddingState::default()),
        }
    }

    /// Fail any text containing `needle`
    pub fn fail_when(&self, needle: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .failing_needles
            .push(needle.into());
    }

    /// Fail every `embed_many` call, forcing per-text fallbacks
    pub fn fail_batches(&self) {
        self.state.lock().unwrap().fail_batches = true;
    }

    pub fn embed_calls(&self) -> usize {
        self.state.lock().unwrap().embed_calls
    }

    pub fn batch_calls(&self) -> usize {
        self.state.lock().unwrap().batch_calls
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        self.vocabulary
            .iter()
            .map(|word| tokens.iter().filter(|t| **t == word.as_str()).count() as f32)
            .collect()
    }

    fn check(&self, text: &str) -> ApiResult<()> {
        let state = self.state.lock().unwrap();
        match state.failing_needles.iter().find(|n| text.contains(n.as_str())) {
            Some(needle) => Err(ApiError::http(500, format!("cannot embed text containing {needle}"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbeddingProvider {
    async fn embed(&self, text: &str) -> ApiResult<Vec<f32>> {
        self.state.lock().unwrap().embed_calls += 1;
        self.check(text)?;
        Ok(self.vectorize(text))
    }

    async fn embed_many(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>> {
        {
            let mut state = self.state.lock().unwrap();
            state.batch_calls += 1;
            if state.fail_batches {
                return Err(ApiError::http(500, "batch rejected"));
            }
        }
        texts
            .iter()
            .map(|text| {
                self.check(text)?;
                Ok(self.vectorize(text))
            })
            .collect()
    }

    fn model_name(&self) -> &str {
        "keyword-mock"
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.vocabulary.len())
    }
}
