//! Offline embedder based on signed feature hashing
//!
//! Each token is hashed with blake3 into one of `dimensions` buckets with a
//! +1/-1 sign, and the result is L2-normalized. Texts sharing vocabulary get
//! similar vectors, with no network and no model download. Runs of CJK
//! characters are split into single characters so Chinese text hashes
//! meaningfully.

use async_trait::async_trait;
use bookgraph_core::{ApiResult, EmbeddingProvider};

/// Deterministic embedder selected by `provider = "mock"`
pub struct HashingEmbeddingProvider {
    dimensions: usize,
    model: String,
}

impl HashingEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            model: format!("feature-hashing-{}", dimensions.max(1)),
        }
    }

    /// Vector for `text`; same input, same output
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokenize(text) {
            let hash = blake3::hash(token.as_bytes());
            let bytes = hash.as_bytes();
            let mut head = [0u8; 8];
            head.copy_from_slice(&bytes[..8]);
            let value = u64::from_le_bytes(head);
            let bucket = (value % self.dimensions as u64) as usize;
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if word.is_ascii() {
            tokens.push(word.to_lowercase());
        } else {
            tokens.extend(word.chars().map(|c| c.to_lowercase().collect::<String>()));
        }
    }
    tokens
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> ApiResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_many(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }
}
