//! Directory layout of a saved index
//!
//! ```text
//! <dir>/records.json          ordered array of records
//! <dir>/triplets.json         ordered array of triplets
//! <dir>/nodes.json            entity -> incident triplet positions
//! <dir>/vectors.json          ordered array of {id, vector}
//! <dir>/index_manifest.json   optional provenance
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{GraphIndex, IndexManifest, INDEX_FORMAT_VERSION};
use crate::error::{BookgraphError, BookgraphResult};
use crate::graph::GraphStore;
use crate::types::{Record, Triplet, TripletId};
use crate::vector::EmbeddingIndex;

pub const RECORDS_FILE: &str = "records.json";
pub const TRIPLETS_FILE: &str = "triplets.json";
pub const NODES_FILE: &str = "nodes.json";
pub const VECTORS_FILE: &str = "vectors.json";
pub const MANIFEST_FILE: &str = "index_manifest.json";

/// Files that must exist for an index to load
pub const REQUIRED_FILES: [&str; 4] = [RECORDS_FILE, TRIPLETS_FILE, NODES_FILE, VECTORS_FILE];

#[derive(Serialize, Deserialize)]
struct StoredVector {
    id: String,
    vector: Vec<f32>,
}

impl GraphIndex {
    /// Write the index into `dir`, creating it if needed
    pub fn persist(&self, dir: &Path) -> BookgraphResult<()> {
        fs::create_dir_all(dir)?;

        write_json(&dir.join(RECORDS_FILE), &self.records, true)?;
        write_json(&dir.join(TRIPLETS_FILE), self.graph.triplets(), true)?;

        let nodes: BTreeMap<&str, &BTreeSet<TripletId>> = self
            .graph
            .nodes()
            .map(|node| (node.entity.as_str(), &node.triplets))
            .collect();
        write_json(&dir.join(NODES_FILE), &nodes, true)?;

        let vectors: Vec<StoredVector> = self
            .vectors
            .iter()
            .map(|(id, vector)| StoredVector {
                id: id.to_string(),
                vector: vector.to_vec(),
            })
            .collect();
        write_json(&dir.join(VECTORS_FILE), &vectors, false)?;

        if let Some(manifest) = &self.manifest {
            write_json(&dir.join(MANIFEST_FILE), manifest, true)?;
        }

        info!(
            "Persisted index ({} records, {} triplets, {} vectors) to {}",
            self.records.len(),
            self.graph.len(),
            self.vectors.len(),
            dir.display()
        );
        Ok(())
    }

    /// Load an index written by [`persist`](Self::persist)
    ///
    /// A missing required file, unreadable JSON or any inconsistency between
    /// the files is a [`BookgraphError::CorruptIndex`].
    pub fn load(dir: &Path) -> BookgraphResult<Self> {
        if !dir.is_dir() {
            return Err(BookgraphError::corrupt(format!(
                "index directory {} does not exist",
                dir.display()
            )));
        }
        for name in REQUIRED_FILES {
            if !dir.join(name).is_file() {
                return Err(BookgraphError::corrupt(format!(
                    "missing {} in {}",
                    name,
                    dir.display()
                )));
            }
        }

        let records: Vec<Record> = read_json(&dir.join(RECORDS_FILE))?;
        let triplets: Vec<Triplet> = read_json(&dir.join(TRIPLETS_FILE))?;
        let nodes: BTreeMap<String, BTreeSet<TripletId>> = read_json(&dir.join(NODES_FILE))?;
        let stored_vectors: Vec<StoredVector> = read_json(&dir.join(VECTORS_FILE))?;

        let graph = GraphStore::from_triplets(triplets);
        check_nodes(&graph, &nodes)?;

        let mut vectors = EmbeddingIndex::new();
        for stored in stored_vectors {
            vectors
                .insert(stored.id, stored.vector)
                .map_err(|e| BookgraphError::corrupt(format!("{}: {}", VECTORS_FILE, e)))?;
        }

        let mut index = GraphIndex::new(records, graph, vectors)?;

        let manifest_path = dir.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            let manifest: IndexManifest = read_json(&manifest_path)?;
            check_manifest(&manifest, &index)?;
            index = index.with_manifest(manifest);
        } else {
            debug!("No {} in {}", MANIFEST_FILE, dir.display());
        }

        info!(
            "Loaded index ({} records, {} triplets, {} vectors) from {}",
            index.records.len(),
            index.graph.len(),
            index.vectors.len(),
            dir.display()
        );
        Ok(index)
    }
}

fn check_nodes(
    graph: &GraphStore,
    nodes: &BTreeMap<String, BTreeSet<TripletId>>,
) -> BookgraphResult<()> {
    for (entity, ids) in nodes {
        for &id in ids {
            match graph.get(id) {
                None => {
                    return Err(BookgraphError::corrupt(format!(
                        "node {} references triplet {} of {}",
                        entity,
                        id,
                        graph.len()
                    )))
                }
                Some(triplet) if !triplet.touches(entity) => {
                    return Err(BookgraphError::corrupt(format!(
                        "node {} lists triplet {} {} which does not touch it",
                        entity, id, triplet
                    )))
                }
                Some(_) => {}
            }
        }
    }

    for node in graph.nodes() {
        if nodes.get(&node.entity) != Some(&node.triplets) {
            return Err(BookgraphError::corrupt(format!(
                "{} disagrees with {} for entity {}",
                NODES_FILE, TRIPLETS_FILE, node.entity
            )));
        }
    }
    if nodes.len() != graph.node_count() {
        return Err(BookgraphError::corrupt(format!(
            "{} has {} entities, triplets define {}",
            NODES_FILE,
            nodes.len(),
            graph.node_count()
        )));
    }
    Ok(())
}

fn check_manifest(manifest: &IndexManifest, index: &GraphIndex) -> BookgraphResult<()> {
    if manifest.format_version > INDEX_FORMAT_VERSION {
        return Err(BookgraphError::corrupt(format!(
            "index format version {} is newer than supported version {}",
            manifest.format_version, INDEX_FORMAT_VERSION
        )));
    }
    if manifest.record_count != index.records.len() || manifest.triplet_count != index.graph.len()
    {
        return Err(BookgraphError::corrupt(format!(
            "manifest counts ({} records, {} triplets) do not match data ({} records, {} triplets)",
            manifest.record_count,
            manifest.triplet_count,
            index.records.len(),
            index.graph.len()
        )));
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> BookgraphResult<T> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        BookgraphError::corrupt(format!("cannot parse {}: {}", path.display(), e))
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> BookgraphResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    written.map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> GraphIndex {
        let records = vec![Record::new("1", "Dune", "Sand."), Record::new("2", "Emma", "Tea.")];
        let graph = GraphStore::from_triplets([
            Triplet::new("Paul", "LIVES_ON", "Arrakis", "1"),
            Triplet::new("Emma", "MEDDLES_WITH", "Harriet", "2"),
        ]);
        let mut vectors = EmbeddingIndex::new();
        vectors.insert("1", vec![1.0, 0.0]).unwrap();
        vectors.insert("2", vec![0.0, 1.0]).unwrap();
        GraphIndex::new(records, graph, vectors)
            .unwrap()
            .with_manifest(IndexManifest::new("chat", "embed", Some(2), 2, 2))
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let index = sample();
        index.persist(dir.path()).unwrap();

        let loaded = GraphIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.records(), index.records());
        assert_eq!(loaded.graph(), index.graph());
        assert_eq!(loaded.vectors(), index.vectors());
        assert_eq!(loaded.manifest(), index.manifest());
    }

    #[test]
    fn test_persist_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        sample().persist(&nested).unwrap();
        assert!(nested.join(RECORDS_FILE).is_file());
    }

    #[test]
    fn test_missing_file_is_corrupt() {
        for name in REQUIRED_FILES {
            let dir = TempDir::new().unwrap();
            sample().persist(dir.path()).unwrap();
            fs::remove_file(dir.path().join(name)).unwrap();

            let err = GraphIndex::load(dir.path()).unwrap_err();
            assert!(
                matches!(&err, BookgraphError::CorruptIndex(msg) if msg.contains(name)),
                "{}: {}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_manifest_is_optional() {
        let dir = TempDir::new().unwrap();
        sample().persist(dir.path()).unwrap();
        fs::remove_file(dir.path().join(MANIFEST_FILE)).unwrap();
        assert!(GraphIndex::load(dir.path()).unwrap().manifest().is_none());
    }

    #[test]
    fn test_garbage_json_is_corrupt() {
        let dir = TempDir::new().unwrap();
        sample().persist(dir.path()).unwrap();
        fs::write(dir.path().join(TRIPLETS_FILE), "{ not json").unwrap();
        assert!(matches!(
            GraphIndex::load(dir.path()),
            Err(BookgraphError::CorruptIndex(_))
        ));
    }

    #[test]
    fn test_inconsistent_nodes_are_corrupt() {
        let dir = TempDir::new().unwrap();
        sample().persist(dir.path()).unwrap();
        fs::write(dir.path().join(NODES_FILE), r#"{"Paul": [1]}"#).unwrap();
        assert!(matches!(
            GraphIndex::load(dir.path()),
            Err(BookgraphError::CorruptIndex(msg)) if msg.contains("Paul")
        ));
    }

    #[test]
    fn test_missing_directory_is_corrupt() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            GraphIndex::load(&dir.path().join("nope")),
            Err(BookgraphError::CorruptIndex(_))
        ));
    }
}
