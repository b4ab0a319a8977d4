//! The built artifact: records, graph and vectors

mod manifest;
mod persist;

pub use manifest::{IndexManifest, INDEX_FORMAT_VERSION};
pub use persist::{
    MANIFEST_FILE, NODES_FILE, RECORDS_FILE, REQUIRED_FILES, TRIPLETS_FILE, VECTORS_FILE,
};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BookgraphError, BookgraphResult};
use crate::graph::GraphStore;
use crate::types::Record;
use crate::vector::EmbeddingIndex;

/// Everything the query phase needs, read-only once built
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    records: Vec<Record>,
    positions: HashMap<String, usize>,
    graph: GraphStore,
    vectors: EmbeddingIndex,
    manifest: Option<IndexManifest>,
}

/// Sizes reported by `bookgraph stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub records: usize,
    pub triplets: usize,
    pub nodes: usize,
    pub vectors: usize,
    pub dimension: Option<usize>,
}

impl GraphIndex {
    /// Assemble an index, checking that every triplet and vector refers to a
    /// known record
    pub fn new(
        records: Vec<Record>,
        graph: GraphStore,
        vectors: EmbeddingIndex,
    ) -> BookgraphResult<Self> {
        let mut positions = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if positions.insert(record.id.clone(), position).is_some() {
                return Err(BookgraphError::corrupt(format!(
                    "record id {} appears more than once",
                    record.id
                )));
            }
        }

        if let Some((position, triplet)) = graph
            .triplets()
            .iter()
            .enumerate()
            .find(|(_, t)| !positions.contains_key(&t.source_record_id))
        {
            return Err(BookgraphError::corrupt(format!(
                "triplet {} {} cites unknown record {}",
                position, triplet, triplet.source_record_id
            )));
        }

        if let Some(id) = vectors.ids().iter().find(|id| !positions.contains_key(*id)) {
            return Err(BookgraphError::corrupt(format!(
                "vector stored for unknown record {}",
                id
            )));
        }

        Ok(Self {
            records,
            positions,
            graph,
            vectors,
            manifest: None,
        })
    }

    pub fn with_manifest(mut self, manifest: IndexManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.positions.get(id).map(|&p| &self.records[p])
    }

    /// Records in ingestion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn vectors(&self) -> &EmbeddingIndex {
        &self.vectors
    }

    pub fn manifest(&self) -> Option<&IndexManifest> {
        self.manifest.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.records.len(),
            triplets: self.graph.len(),
            nodes: self.graph.node_count(),
            vectors: self.vectors.len(),
            dimension: self.vectors.dimension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Triplet;

    #[test]
    fn test_rejects_orphan_triplet() {
        let graph = GraphStore::from_triplets([Triplet::new("A", "R", "B", "missing")]);
        let err = GraphIndex::new(vec![Record::new("1", "T", "")], graph, EmbeddingIndex::new())
            .unwrap_err();
        assert!(matches!(err, BookgraphError::CorruptIndex(msg) if msg.contains("missing")));
    }

    #[test]
    fn test_rejects_orphan_vector() {
        let mut vectors = EmbeddingIndex::new();
        vectors.insert("9", vec![1.0]).unwrap();
        let err = GraphIndex::new(vec![Record::new("1", "T", "")], GraphStore::new(), vectors)
            .unwrap_err();
        assert!(matches!(err, BookgraphError::CorruptIndex(_)));
    }

    #[test]
    fn test_stats() {
        let graph = GraphStore::from_triplets([Triplet::new("A", "R", "B", "1")]);
        let mut vectors = EmbeddingIndex::new();
        vectors.insert("1", vec![1.0, 0.0]).unwrap();
        let index = GraphIndex::new(vec![Record::new("1", "T", "")], graph, vectors).unwrap();

        assert_eq!(
            index.stats(),
            IndexStats {
                records: 1,
                triplets: 1,
                nodes: 2,
                vectors: 1,
                dimension: Some(2),
            }
        );
        assert_eq!(index.record("1").unwrap().title, "T");
    }
}
