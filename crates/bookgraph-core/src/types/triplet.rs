use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a triplet in the graph store
pub type TripletId = usize;

/// A `(subject, relation, object)` fact extracted from one record
///
/// Identical facts from different records are kept separately so each keeps
/// its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triplet {
    pub subject: String,
    pub relation: String,
    pub object: String,
    /// Id of the record the fact was extracted from
    pub source_record_id: String,
}

impl Triplet {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
        source_record_id: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
            source_record_id: source_record_id.into(),
        }
    }

    /// Subject and object
    pub fn entities(&self) -> [&str; 2] {
        [&self.subject, &self.object]
    }

    /// Whether `entity` is one of the endpoints
    pub fn touches(&self, entity: &str) -> bool {
        self.subject == entity || self.object == entity
    }

    pub fn is_self_loop(&self) -> bool {
        self.subject == self.object
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.relation, self.object)
    }
}

/// An entity and the triplets incident to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub entity: String,
    pub triplets: BTreeSet<TripletId>,
}

impl GraphNode {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            triplets: BTreeSet::new(),
        }
    }

    /// Number of incident triplets
    pub fn degree(&self) -> usize {
        self.triplets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let t = Triplet::new("Lu Xun", "WROTE", "Diary of a Madman", "12");
        assert_eq!(t.to_string(), "(Lu Xun, WROTE, Diary of a Madman)");
    }

    #[test]
    fn test_touches_and_self_loop() {
        let t = Triplet::new("A", "KNOWS", "A", "1");
        assert!(t.is_self_loop());
        assert!(t.touches("A"));
        assert!(!t.touches("B"));
    }
}
