//! Vector search plus graph expansion

use std::collections::HashSet;
use std::sync::Arc;

use bookgraph_config::{RetrievalConfig, RetryConfig};
use tracing::debug;

use crate::error::{BookgraphError, BookgraphResult};
use crate::index::GraphIndex;
use crate::retry::retry_with_backoff;
use crate::traits::EmbeddingProvider;
use crate::types::{ContextBundle, Record};

/// Finds the records and facts relevant to a question
///
/// The embedding provider must be the one the index was built with.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    config: RetrievalConfig,
    retry: RetryConfig,
}

impl Retriever {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        config: RetrievalConfig,
        retry: RetryConfig,
    ) -> Self {
        Self {
            provider,
            config,
            retry,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Top-`k` records for `query` and the graph neighborhood of each
    ///
    /// Records are in match-rank order. Triplets follow the same order,
    /// each listed once even when several matches reach it.
    pub async fn retrieve(
        &self,
        index: &GraphIndex,
        query: &str,
        k: usize,
    ) -> BookgraphResult<ContextBundle> {
        if index.is_empty() {
            return Err(BookgraphError::EmptyIndex);
        }

        let query_vector =
            retry_with_backoff(&self.retry, "embed query", || self.provider.embed(query)).await?;
        let matches = index.vectors().search(&query_vector, k)?;
        debug!("Query matched {} record(s): {:?}", matches.len(), matches);

        let graph = index.graph();
        let mut bundle = ContextBundle::default();
        let mut included: HashSet<&str> = HashSet::new();
        let mut collected = HashSet::new();
        let mut triplet_ids = Vec::new();

        for (record_id, _score) in &matches {
            let Some(record) = index.record(record_id) else {
                continue;
            };
            included.insert(record.id.as_str());
            bundle.records.push(record.clone());

            for entity in graph.entities_for_record(record_id) {
                for id in graph.neighbor_ids(entity, self.config.max_hops) {
                    if collected.insert(id) {
                        triplet_ids.push(id);
                    }
                }
            }
        }

        bundle.triplets = triplet_ids
            .iter()
            .filter_map(|&id| graph.get(id).cloned())
            .collect();

        if self.config.expand_related_records {
            let related = self.related_records(index, &bundle, &included);
            debug!("Added {} related record(s)", related.len());
            bundle.records.extend(related);
        }

        Ok(bundle)
    }

    // Records reached through the bundle's entities, in triplet order
    fn related_records(
        &self,
        index: &GraphIndex,
        bundle: &ContextBundle,
        included: &HashSet<&str>,
    ) -> Vec<Record> {
        let mut seen_entities = HashSet::new();
        let mut added: HashSet<String> = HashSet::new();
        let mut related = Vec::new();

        for triplet in &bundle.triplets {
            for entity in triplet.entities() {
                if !seen_entities.insert(entity) {
                    continue;
                }
                for record_id in index.graph().get_records_for_entity(entity) {
                    if related.len() >= self.config.max_related_records {
                        return related;
                    }
                    if included.contains(record_id.as_str()) || added.contains(&record_id) {
                        continue;
                    }
                    if let Some(record) = index.record(&record_id) {
                        related.push(record.clone());
                        added.insert(record_id);
                    }
                }
            }
        }
        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;
    use crate::test_support::mocks::KeywordEmbeddingProvider;
    use crate::types::Triplet;
    use crate::vector::EmbeddingIndex;

    const VOCAB: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

    async fn build(records: Vec<Record>, triplets: Vec<Triplet>) -> GraphIndex {
        let provider = KeywordEmbeddingProvider::new(&VOCAB);
        let (vectors, _) =
            EmbeddingIndex::embed_all(&records, &provider, 8, &RetryConfig::immediate(1)).await;
        GraphIndex::new(records, GraphStore::from_triplets(triplets), vectors).unwrap()
    }

    fn retriever(config: RetrievalConfig) -> Retriever {
        Retriever::new(
            Arc::new(KeywordEmbeddingProvider::new(&VOCAB)),
            config,
            RetryConfig::immediate(1),
        )
    }

    #[tokio::test]
    async fn test_empty_index() {
        let index = GraphIndex::default();
        let err = retriever(RetrievalConfig::default())
            .retrieve(&index, "alpha", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, BookgraphError::EmptyIndex));
    }

    #[tokio::test]
    async fn test_dedupes_shared_triplets() {
        let index = build(
            vec![
                Record::new("1", "One", "alpha"),
                Record::new("2", "Two", "alpha beta"),
            ],
            vec![
                Triplet::new("X", "R", "Y", "1"),
                Triplet::new("Y", "R", "Z", "2"),
            ],
        )
        .await;

        let bundle = retriever(RetrievalConfig::default())
            .retrieve(&index, "alpha", 2)
            .await
            .unwrap();

        assert_eq!(bundle.record_ids(), vec!["1", "2"]);
        assert_eq!(bundle.triplets.len(), 2);
    }

    #[tokio::test]
    async fn test_related_records_expansion() {
        let records = vec![
            Record::new("1", "One", "alpha"),
            Record::new("2", "Two", "gamma"),
            Record::new("3", "Three", "delta"),
        ];
        let triplets = vec![
            Triplet::new("X", "R", "Y", "1"),
            Triplet::new("Y", "R", "Z", "2"),
            Triplet::new("Q", "R", "W", "3"),
        ];

        let plain = retriever(RetrievalConfig::default())
            .retrieve(&build(records.clone(), triplets.clone()).await, "alpha", 1)
            .await
            .unwrap();
        assert_eq!(plain.record_ids(), vec!["1"]);

        let expanded = retriever(RetrievalConfig {
            expand_related_records: true,
            ..Default::default()
        })
        .retrieve(&build(records, triplets).await, "alpha", 1)
        .await
        .unwrap();
        assert_eq!(expanded.record_ids(), vec!["1", "2"]);
    }
}
