//! In-memory knowledge graph
//!
//! Triplets are stored in insertion order and addressed by position; each
//! entity node keeps the positions of the triplets touching it. Entities are
//! matched by exact string, so "Lu Xun" and "lu xun" are different nodes.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::trace;

use crate::types::{GraphNode, Triplet, TripletId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStore {
    triplets: Vec<Triplet>,
    nodes: BTreeMap<String, GraphNode>,
    by_record: HashMap<String, Vec<TripletId>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store by adding `triplets` in order
    pub fn from_triplets(triplets: impl IntoIterator<Item = Triplet>) -> Self {
        let mut store = Self::new();
        for triplet in triplets {
            store.add_triplet(triplet);
        }
        store
    }

    /// Append a triplet, creating missing endpoint nodes
    ///
    /// Duplicates are kept; a self-loop is registered once on its node.
    pub fn add_triplet(&mut self, triplet: Triplet) -> TripletId {
        let id = self.triplets.len();
        for entity in triplet.entities() {
            self.nodes
                .entry(entity.to_string())
                .or_insert_with(|| GraphNode::new(entity))
                .triplets
                .insert(id);
        }
        self.by_record
            .entry(triplet.source_record_id.clone())
            .or_default()
            .push(id);
        trace!("Added triplet {}: {}", id, triplet);
        self.triplets.push(triplet);
        id
    }

    /// Triplets reachable from `entity` within `max_hops` hops
    ///
    /// Hop 1 is the triplets touching `entity`; hop `n + 1` adds those
    /// touching any entity first reached at hop `n`. Each triplet appears
    /// once, entities are expanded once, and the result is in discovery
    /// order. Unknown entities and `max_hops == 0` yield nothing.
    pub fn neighbors(&self, entity: &str, max_hops: usize) -> Vec<&Triplet> {
        self.neighbor_ids(entity, max_hops)
            .into_iter()
            .map(|id| &self.triplets[id])
            .collect()
    }

    /// Positions of the triplets returned by [`neighbors`](Self::neighbors)
    pub fn neighbor_ids(&self, entity: &str, max_hops: usize) -> Vec<TripletId> {
        if max_hops == 0 || !self.nodes.contains_key(entity) {
            return Vec::new();
        }

        let mut visited: HashSet<&str> = HashSet::from([entity]);
        let mut collected: HashSet<TripletId> = HashSet::new();
        let mut found = Vec::new();
        let mut frontier = vec![entity];

        for _ in 0..max_hops {
            let mut next = Vec::new();
            for current in frontier {
                let Some(node) = self.nodes.get(current) else {
                    continue;
                };
                for &id in &node.triplets {
                    if collected.insert(id) {
                        found.push(id);
                    }
                    for other in self.triplets[id].entities() {
                        if visited.insert(other) {
                            next.push(other);
                        }
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        found
    }

    /// Ids of the records whose triplets touch `entity`
    pub fn get_records_for_entity(&self, entity: &str) -> BTreeSet<String> {
        self.nodes
            .get(entity)
            .map(|node| {
                node.triplets
                    .iter()
                    .map(|&id| self.triplets[id].source_record_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Triplets extracted from `record_id`, in insertion order
    pub fn triplets_for_record(&self, record_id: &str) -> Vec<&Triplet> {
        self.by_record
            .get(record_id)
            .map(|ids| ids.iter().map(|&id| &self.triplets[id]).collect())
            .unwrap_or_default()
    }

    /// Distinct entities mentioned by `record_id`'s triplets, first mention first
    pub fn entities_for_record(&self, record_id: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for triplet in self.triplets_for_record(record_id) {
            for entity in triplet.entities() {
                if seen.insert(entity) {
                    entities.push(entity);
                }
            }
        }
        entities
    }

    pub fn node(&self, entity: &str) -> Option<&GraphNode> {
        self.nodes.get(entity)
    }

    pub fn get(&self, id: TripletId) -> Option<&Triplet> {
        self.triplets.get(id)
    }

    pub fn triplets(&self) -> &[Triplet] {
        &self.triplets
    }

    /// Nodes in entity order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.triplets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triplets.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The `n` entities with most incident triplets, ties by name
    pub fn top_entities(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .nodes
            .values()
            .map(|node| (node.entity.as_str(), node.degree()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}
