use serde::{Deserialize, Serialize};

use super::{Record, Triplet};

/// Records and triplets retrieved for one query, in match-rank order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub records: Vec<Record>,
    pub triplets: Vec<Triplet>,
}

impl ContextBundle {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.triplets.is_empty()
    }

    /// Ids of the bundled records, in order
    pub fn record_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }
}
