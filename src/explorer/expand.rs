//! Expansion: fetch an entity's neighbours and merge them into the graph

use super::events::Notice;
use super::provenance::ExpansionRecord;
use super::Explorer;
use crate::client::TransportError;
use crate::graph::{EdgeId, EntityId, EntityType, MergeOutcome};
use crate::normalize::normalize_all;
use futures_util::future::join_all;
use tracing::{error, info, warn};

/// What an expansion did
#[derive(Debug, Clone, PartialEq)]
pub enum ExpandOutcome {
    /// The source entity is not in the graph
    UnknownSource,
    /// The neighbour fetch failed; nothing was merged
    Failed(TransportError),
    /// The backend returned no neighbours
    NoConnections,
    Expanded {
        /// Nodes this expansion introduced
        added_nodes: Vec<EntityId>,
        /// Edges this expansion introduced
        added_edges: Vec<EdgeId>,
        /// Already present nodes whose refreshable fields changed
        refreshed: Vec<EntityId>,
    },
}

impl ExpandOutcome {
    /// Number of nodes introduced (zero for every non-`Expanded` outcome)
    pub fn added_node_count(&self) -> usize {
        match self {
            Self::Expanded { added_nodes, .. } => added_nodes.len(),
            _ => 0,
        }
    }
}

impl Explorer {
    /// Expand an entity: fetch its neighbours, merge them, wire edges and
    /// record provenance, then probe every newly added node.
    ///
    /// Resolves only after those probes finish, so decorations are final
    /// when it returns. `emit_empty_message` is set for user-initiated or
    /// top-level expansions only.
    pub async fn expand(
        &self,
        entity_type: EntityType,
        key: &str,
        emit_empty_message: bool,
    ) -> ExpandOutcome {
        let source = EntityId::new(entity_type, key);
        if !self.has(&source) {
            warn!(%source, "refusing to expand an entity that is not in the graph");
            return ExpandOutcome::UnknownSource;
        }

        let raw = match self.client.neighbours(entity_type, key).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(%source, error = %e, "error expanding node");
                if emit_empty_message {
                    self.notify(Notice::NoFurtherConnections);
                }
                return ExpandOutcome::Failed(e);
            }
        };

        // A collapse may have removed the source while the fetch was in flight.
        if !self.has(&source) {
            warn!(%source, "source left the graph during expansion");
            return ExpandOutcome::UnknownSource;
        }

        if raw.is_empty() {
            self.oracle.settle(&source, false);
            if emit_empty_message {
                self.notify(Notice::NoConnections);
            }
            info!(%source, "no connections");
            return ExpandOutcome::NoConnections;
        }

        // Having just supplied neighbours, the source is expandable by construction.
        self.oracle.settle(&source, true);

        let mut record = ExpansionRecord::new();
        let mut added_nodes = Vec::new();
        let mut refreshed = Vec::new();
        {
            let mut store = self.lock_store();
            for entity in normalize_all(&raw) {
                let target = entity.id();
                match store.merge(entity) {
                    MergeOutcome::Inserted => {
                        record.claim_node(target.clone());
                        added_nodes.push(target.clone());
                    }
                    MergeOutcome::Refreshed => refreshed.push(target.clone()),
                    MergeOutcome::Unchanged => {}
                }

                match store.add_edge(&source, &target) {
                    Ok(true) => record.claim_edge(EdgeId::between(&source, &target)),
                    Ok(false) => {}
                    Err(e) => warn!(%source, %target, error = %e, "edge rejected"),
                }
            }
        }

        let mut added_edges: Vec<EdgeId> = record.added_edges.iter().cloned().collect();
        added_edges.sort();
        self.lock_ledger().record(source.clone(), record);

        if added_nodes.is_empty() && emit_empty_message {
            self.notify(Notice::NoFurtherConnections);
        }
        info!(
            %source,
            neighbours = raw.len(),
            added_nodes = added_nodes.len(),
            added_edges = added_edges.len(),
            refreshed = refreshed.len(),
            "expanded"
        );

        join_all(added_nodes.iter().map(|id| self.oracle.check(id))).await;

        ExpandOutcome::Expanded {
            added_nodes,
            added_edges,
            refreshed,
        }
    }
}
