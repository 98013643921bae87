//! Expansion provenance
//!
//! Each expansion records the nodes and edges it introduced, so a later
//! collapse removes exactly those. A node or edge is claimed only by the
//! expansion that first materialized it.

use crate::graph::{EdgeId, EntityId};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// What one expansion added to the graph
#[derive(Debug, Clone)]
pub struct ExpansionRecord {
    pub added_nodes: HashSet<EntityId>,
    pub added_edges: HashSet<EdgeId>,
    /// When the entity was last expanded
    pub expanded_at: DateTime<Utc>,
}

impl ExpansionRecord {
    pub fn new() -> Self {
        Self {
            added_nodes: HashSet::new(),
            added_edges: HashSet::new(),
            expanded_at: Utc::now(),
        }
    }

    pub fn claim_node(&mut self, id: EntityId) {
        self.added_nodes.insert(id);
    }

    pub fn claim_edge(&mut self, id: EdgeId) {
        self.added_edges.insert(id);
    }

    /// Fold a later expansion of the same entity into this record.
    pub fn absorb(&mut self, later: ExpansionRecord) {
        self.added_nodes.extend(later.added_nodes);
        self.added_edges.extend(later.added_edges);
        self.expanded_at = later.expanded_at;
    }

    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty() && self.added_edges.is_empty()
    }
}

impl Default for ExpansionRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Expansion records of every currently expanded entity.
///
/// An entity is "expanded" exactly when it has a record here.
#[derive(Debug, Default)]
pub struct ExpansionLedger {
    records: HashMap<EntityId, ExpansionRecord>,
}

impl ExpansionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record, extending the existing one if the entity is already expanded.
    pub fn record(&mut self, id: EntityId, record: ExpansionRecord) {
        match self.records.get_mut(&id) {
            Some(existing) => existing.absorb(record),
            None => {
                self.records.insert(id, record);
            }
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&ExpansionRecord> {
        self.records.get(id)
    }

    pub fn take(&mut self, id: &EntityId) -> Option<ExpansionRecord> {
        self.records.remove(id)
    }

    pub fn is_expanded(&self, id: &EntityId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
