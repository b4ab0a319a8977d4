//! Online query: retrieve, then compose

use std::sync::Arc;

use tracing::{info, instrument};

use crate::compose::ResponseComposer;
use crate::error::BookgraphResult;
use crate::index::GraphIndex;
use crate::retrieval::Retriever;
use crate::types::ContextBundle;

/// The model's answer and the context it was given
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub answer: String,
    pub context: ContextBundle,
}

/// Answers questions against a loaded index
///
/// Holds the index behind an `Arc` and never mutates it, so one engine can
/// serve concurrent queries.
pub struct QueryEngine {
    index: Arc<GraphIndex>,
    retriever: Retriever,
    composer: ResponseComposer,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(index: Arc<GraphIndex>, retriever: Retriever, composer: ResponseComposer) -> Self {
        let top_k = retriever.config().top_k;
        Self {
            index,
            retriever,
            composer,
            top_k,
        }
    }

    /// Override the number of records matched per query
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    #[instrument(skip(self), fields(top_k = self.top_k))]
    pub async fn query(&self, question: &str) -> BookgraphResult<QueryAnswer> {
        let context = self
            .retriever
            .retrieve(&self.index, question, self.top_k)
            .await?;
        info!(
            "Retrieved {} record(s) and {} triplet(s)",
            context.records.len(),
            context.triplets.len()
        );
        let answer = self.composer.compose(question, &context).await?;
        Ok(QueryAnswer { answer, context })
    }
}
