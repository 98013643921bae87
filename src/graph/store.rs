//! GraphStore: the nodes and edges currently materialized in a session

use super::edge::{Edge, EdgeId};
use super::entity::{Entity, EntityId};
use super::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur in graph store operations
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Entity already present: {0}")]
    DuplicateEntity(EntityId),

    #[error("Edge endpoint not in graph: {0}")]
    MissingEndpoint(EntityId),
}

/// Result type for graph store operations
pub type GraphResult<T> = Result<T, GraphError>;

/// What `merge` did with an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The entity was new and has been added
    Inserted,
    /// The entity was present and its refreshable fields changed
    Refreshed,
    /// The entity was present and nothing changed
    Unchanged,
}

/// Nodes and edges for the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The set of materialized nodes and edges, keyed by canonical identity.
///
/// Maintains an adjacency index so `edges_of` does not scan every edge.
/// No edge is ever stored unless both endpoints are present.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: HashMap<EntityId, Node>,
    edges: HashMap<EdgeId, Edge>,
    adjacency: HashMap<EntityId, HashSet<EdgeId>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &EntityId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Add a new entity. Fails if its identity is already present.
    pub fn add(&mut self, entity: Entity) -> GraphResult<EntityId> {
        let id = entity.id();
        if self.has(&id) {
            return Err(GraphError::DuplicateEntity(id));
        }
        self.nodes.insert(id.clone(), Node::new(entity));
        Ok(id)
    }

    /// Insert the entity if absent, otherwise refresh its refreshable fields.
    pub fn merge(&mut self, entity: Entity) -> MergeOutcome {
        let id = entity.id();
        match self.nodes.get_mut(&id) {
            Some(node) => {
                if node.refresh(entity) {
                    MergeOutcome::Refreshed
                } else {
                    MergeOutcome::Unchanged
                }
            }
            None => {
                self.nodes.insert(id, Node::new(entity));
                MergeOutcome::Inserted
            }
        }
    }

    /// Connect two nodes.
    ///
    /// Returns `Ok(true)` if the edge was created, `Ok(false)` if it already
    /// existed.
    pub fn add_edge(&mut self, a: &EntityId, b: &EntityId) -> GraphResult<bool> {
        for endpoint in [a, b] {
            if !self.has(endpoint) {
                return Err(GraphError::MissingEndpoint(endpoint.clone()));
            }
        }

        let edge = Edge::new(a.clone(), b.clone());
        if self.edges.contains_key(&edge.id) {
            return Ok(false);
        }
        self.adjacency.entry(a.clone()).or_default().insert(edge.id.clone());
        self.adjacency.entry(b.clone()).or_default().insert(edge.id.clone());
        self.edges.insert(edge.id.clone(), edge);
        Ok(true)
    }

    /// Remove a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &EntityId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        for edge_id in self.adjacency.remove(id).unwrap_or_default() {
            self.remove_edge(&edge_id);
        }
        Some(node)
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> bool {
        let Some(edge) = self.edges.remove(id) else {
            return false;
        };
        for endpoint in [&edge.source, &edge.target] {
            if let Some(set) = self.adjacency.get_mut(endpoint) {
                set.remove(id);
                if set.is_empty() {
                    self.adjacency.remove(endpoint);
                }
            }
        }
        true
    }

    pub fn has_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// Identities of every edge touching a node
    pub fn edges_of(&self, id: &EntityId) -> HashSet<EdgeId> {
        self.adjacency.get(id).cloned().unwrap_or_default()
    }

    pub fn has_edges(&self, id: &EntityId) -> bool {
        self.adjacency.get(id).is_some_and(|set| !set.is_empty())
    }

    pub fn node(&self, id: &EntityId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Record an expandability verdict on a node. No-op for absent nodes.
    pub fn set_expandability(&mut self, id: &EntityId, expandable: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.set_expandability(expandable);
                true
            }
            None => false,
        }
    }

    /// Copy the current nodes and edges, sorted by identity
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<Edge> = self.edges.values().cloned().collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        GraphSnapshot { nodes, edges }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjacency.clear();
    }
}
