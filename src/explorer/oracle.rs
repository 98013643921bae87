//! Expandability oracle
//!
//! Decides whether expanding an entity would reveal at least one node that
//! is not already in the graph. Each identity is probed at most once at a
//! time: concurrent callers share the in-flight probe through a per-identity
//! `OnceCell`, and the verdict stays cached until the entry is invalidated.
//! Invalidating a running probe keeps it shared but drops its verdict once
//! it lands.

use crate::client::NeighbourClient;
use crate::graph::{EntityId, EntityType, GraphStore};
use crate::lock;
use crate::normalize::normalize_all;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// One identity's verdict, shared by every caller waiting on it
#[derive(Debug, Default)]
struct Slot {
    verdict: OnceCell<bool>,
    /// Invalidated while the probe was running
    stale: AtomicBool,
}

impl Slot {
    fn settled(expandable: bool) -> Self {
        Self {
            verdict: OnceCell::new_with(Some(expandable)),
            stale: AtomicBool::new(false),
        }
    }
}

pub struct ExpandabilityOracle {
    client: Arc<dyn NeighbourClient>,
    store: Arc<Mutex<GraphStore>>,
    verdicts: DashMap<EntityId, Arc<Slot>>,
}

impl ExpandabilityOracle {
    pub fn new(client: Arc<dyn NeighbourClient>, store: Arc<Mutex<GraphStore>>) -> Self {
        Self {
            client,
            store,
            verdicts: DashMap::new(),
        }
    }

    /// Whether expanding `id` would add a node not currently in the graph.
    ///
    /// The first call probes the backend; later and concurrent calls reuse
    /// that probe's verdict. Transport failures resolve to `false`.
    pub async fn check(&self, id: &EntityId) -> bool {
        let Some((entity_type, key)) = id.parts() else {
            debug!(%id, "cannot probe malformed identity");
            return false;
        };

        let slot = self
            .verdicts
            .entry(id.clone())
            .or_default()
            .value()
            .clone();

        *slot
            .verdict
            .get_or_init(|| self.probe(id, entity_type, key, &slot))
            .await
    }

    async fn probe(&self, id: &EntityId, entity_type: EntityType, key: &str, slot: &Arc<Slot>) -> bool {
        let verdict = match self.client.neighbours(entity_type, key).await {
            Ok(raw) => {
                let candidates = normalize_all(&raw);
                let store = lock(&self.store);
                candidates.iter().any(|e| !store.has(&e.id()))
            }
            Err(e) => {
                warn!(%id, error = %e, "expandability probe failed");
                false
            }
        };
        debug!(%id, verdict, "expandability probed");

        // A settle or clear that landed mid-probe owns the decoration now.
        if self.is_current(id, slot) {
            lock(&self.store).set_expandability(id, verdict);
            if slot.stale.load(Ordering::SeqCst) {
                self.verdicts
                    .remove_if(id, |_, current| Arc::ptr_eq(current, slot));
            }
        }
        verdict
    }

    fn is_current(&self, id: &EntityId, slot: &Arc<Slot>) -> bool {
        self.verdicts
            .get(id)
            .is_some_and(|current| Arc::ptr_eq(current.value(), slot))
    }

    /// Record a verdict known without probing (e.g. from a finished expansion).
    pub fn settle(&self, id: &EntityId, expandable: bool) {
        self.verdicts
            .insert(id.clone(), Arc::new(Slot::settled(expandable)));
        lock(&self.store).set_expandability(id, expandable);
    }

    /// The cached verdict, if a probe has completed or a verdict was settled
    pub fn cached(&self, id: &EntityId) -> Option<bool> {
        self.verdicts.get(id).and_then(|slot| slot.verdict.get().copied())
    }

    /// Forget the verdict so the next check probes again.
    ///
    /// A probe still running stays shared with new callers; its verdict is
    /// dropped once it lands.
    pub fn invalidate(&self, id: &EntityId) {
        if let Entry::Occupied(entry) = self.verdicts.entry(id.clone()) {
            if entry.get().verdict.initialized() {
                entry.remove();
            } else {
                entry.get().stale.store(true, Ordering::SeqCst);
            }
        }
    }

    pub fn clear(&self) {
        self.verdicts.clear();
    }
}

impl std::fmt::Debug for ExpandabilityOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpandabilityOracle")
            .field("verdicts", &self.verdicts.len())
            .finish()
    }
}
