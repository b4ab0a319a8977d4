//! Record embeddings and cosine search

use std::collections::HashMap;

use bookgraph_config::RetryConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{BookgraphError, BookgraphResult};
use crate::retry::retry_with_backoff;
use crate::traits::EmbeddingProvider;
use crate::types::Record;

/// A record that could not be embedded during a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingFailure {
    pub record_id: String,
    pub message: String,
}

/// Record vectors in insertion order
///
/// All vectors share the dimension of the first one inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingIndex {
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
    positions: HashMap<String, usize>,
}

impl EmbeddingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the vector for `id`
    pub fn insert(&mut self, id: impl Into<String>, vector: Vec<f32>) -> BookgraphResult<()> {
        let id = id.into();
        if let Some(expected) = self.dimension() {
            if vector.len() != expected {
                return Err(BookgraphError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }
        if self.positions.contains_key(&id) {
            return Err(BookgraphError::DuplicateId(id));
        }
        self.positions.insert(id.clone(), self.ids.len());
        self.ids.push(id);
        self.vectors.push(vector);
        Ok(())
    }

    /// Up to `k` ids by descending cosine similarity to `query`
    ///
    /// Equal scores keep insertion order. `k >= len()` returns every id once.
    pub fn search(&self, query: &[f32], k: usize) -> BookgraphResult<Vec<(String, f32)>> {
        if let Some(expected) = self.dimension() {
            if query.len() != expected {
                return Err(BookgraphError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, cosine_similarity(query, vector)))
            .collect();
        // stable: ties stay in insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(position, score)| (self.ids[position].clone(), score))
            .collect())
    }

    pub fn get(&self, id: &str) -> Option<&[f32]> {
        self.positions.get(id).map(|&p| self.vectors[p].as_slice())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// `(id, vector)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.ids
            .iter()
            .zip(&self.vectors)
            .map(|(id, v)| (id.as_str(), v.as_slice()))
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn dimension(&self) -> Option<usize> {
        self.vectors.first().map(Vec::len)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Embed every record's document text
    ///
    /// Records go out in batches of `batch_size`. A batch that fails after
    /// retries is re-sent one record at a time; records that still fail are
    /// returned as [`EmbeddingFailure`]s instead of aborting the build.
    pub async fn embed_all(
        records: &[Record],
        provider: &dyn EmbeddingProvider,
        batch_size: usize,
        retry: &RetryConfig,
    ) -> (Self, Vec<EmbeddingFailure>) {
        let mut index = Self::new();
        let mut failures = Vec::new();
        let batch_size = batch_size.max(1);
        let total_batches = records.len().div_ceil(batch_size);

        for (batch_number, batch) in records.chunks(batch_size).enumerate() {
            debug!(
                "Embedding batch {}/{} ({} records)",
                batch_number + 1,
                total_batches,
                batch.len()
            );
            let texts: Vec<String> = batch.iter().map(Record::document_text).collect();
            let label = format!("embed batch {}", batch_number + 1);

            match retry_with_backoff(retry, &label, || provider.embed_many(&texts)).await {
                Ok(vectors) if vectors.len() == batch.len() => {
                    for (record, vector) in batch.iter().zip(vectors) {
                        index.insert_or_record(record, vector, &mut failures);
                    }
                }
                outcome => {
                    match outcome {
                        Ok(vectors) => warn!(
                            "Embedding batch {} returned {} vectors for {} records, retrying per record",
                            batch_number + 1,
                            vectors.len(),
                            batch.len()
                        ),
                        Err(error) => warn!(
                            "Embedding batch {} failed ({}), retrying per record",
                            batch_number + 1,
                            error
                        ),
                    }
                    for (record, text) in batch.iter().zip(&texts) {
                        let label = format!("embed record {}", record.id);
                        match retry_with_backoff(retry, &label, || provider.embed(text)).await {
                            Ok(vector) => index.insert_or_record(record, vector, &mut failures),
                            Err(error) => {
                                warn!("Could not embed record {}: {}", record.id, error);
                                failures.push(EmbeddingFailure {
                                    record_id: record.id.clone(),
                                    message: error.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        }

        info!(
            "Embedded {} of {} records ({} failed)",
            index.len(),
            records.len(),
            failures.len()
        );
        (index, failures)
    }

    fn insert_or_record(
        &mut self,
        record: &Record,
        vector: Vec<f32>,
        failures: &mut Vec<EmbeddingFailure>,
    ) {
        if let Err(error) = self.insert(record.id.clone(), vector) {
            warn!("Rejected embedding for record {}: {}", record.id, error);
            failures.push(EmbeddingFailure {
                record_id: record.id.clone(),
                message: error.to_string(),
            });
        }
    }
}

/// Cosine similarity; zero when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
