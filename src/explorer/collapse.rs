//! Collapse: undo what an expansion added, keeping shared nodes

use super::expand::ExpandOutcome;
use super::Explorer;
use crate::graph::{EdgeId, EntityId, EntityType};
use tracing::{debug, info};

/// What a collapse removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapseOutcome {
    /// False if the entity had no expansion record
    pub was_expanded: bool,
    pub removed_nodes: Vec<EntityId>,
    pub removed_edges: Vec<EdgeId>,
}

/// Result of a click-style toggle
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Collapsed(CollapseOutcome),
    Expanded(ExpandOutcome),
    /// The entity is absent, or neither expanded nor expandable
    Ignored,
}

impl Explorer {
    /// Collapse an expanded entity.
    ///
    /// Removes every edge its expansion introduced, then every node it
    /// introduced that has no edges left. Nodes still connected through
    /// another expansion survive. Collapsing an entity that was never
    /// expanded does nothing.
    pub fn collapse(&self, id: &EntityId) -> CollapseOutcome {
        let Some(record) = self.lock_ledger().take(id) else {
            debug!(%id, "collapse without expansion record");
            return CollapseOutcome::default();
        };

        let mut edges: Vec<EdgeId> = record.added_edges.into_iter().collect();
        edges.sort();
        let mut nodes: Vec<EntityId> = record.added_nodes.into_iter().collect();
        nodes.sort();

        let mut outcome = CollapseOutcome {
            was_expanded: true,
            ..Default::default()
        };
        {
            let mut store = self.lock_store();
            for edge in edges {
                if store.remove_edge(&edge) {
                    outcome.removed_edges.push(edge);
                }
            }
            for node in nodes {
                if store.has(&node) && !store.has_edges(&node) {
                    store.remove_node(&node);
                    outcome.removed_nodes.push(node);
                }
            }
        }

        {
            let mut ledger = self.lock_ledger();
            for node in &outcome.removed_nodes {
                self.oracle.invalidate(node);
                ledger.take(node);
            }
        }

        info!(
            %id,
            removed_nodes = outcome.removed_nodes.len(),
            removed_edges = outcome.removed_edges.len(),
            "collapsed"
        );
        outcome
    }

    /// Click behaviour: collapse if expanded, expand if expandable, else nothing.
    ///
    /// Companies trigger backend enrichment before expanding so the
    /// expansion reads fresh risk data.
    pub async fn toggle(&self, id: &EntityId) -> ToggleOutcome {
        if self.is_expanded(id) {
            return ToggleOutcome::Collapsed(self.collapse(id));
        }

        let expandable = self
            .expandability(id)
            .is_some_and(|e| e.is_expandable());
        let Some((entity_type, key)) = id.parts().filter(|_| expandable) else {
            return ToggleOutcome::Ignored;
        };

        if entity_type == EntityType::Company {
            self.enrich(key).await;
        }
        ToggleOutcome::Expanded(self.expand(entity_type, key, true).await)
    }
}
