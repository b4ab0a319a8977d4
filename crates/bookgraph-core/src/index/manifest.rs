use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current on-disk layout version
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Provenance written next to a persisted index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub chat_model: String,
    pub embedding_model: String,
    pub dimensions: Option<usize>,
    pub record_count: usize,
    pub triplet_count: usize,
}

impl IndexManifest {
    pub fn new(
        chat_model: impl Into<String>,
        embedding_model: impl Into<String>,
        dimensions: Option<usize>,
        record_count: usize,
        triplet_count: usize,
    ) -> Self {
        Self {
            format_version: INDEX_FORMAT_VERSION,
            created_at: Utc::now(),
            chat_model: chat_model.into(),
            embedding_model: embedding_model.into(),
            dimensions,
            record_count,
            triplet_count,
        }
    }
}
