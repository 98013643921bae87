//! Explorer: one interactive exploration session
//!
//! Owns the graph store, the expandability oracle, the expansion ledger and
//! pending notices. All of it is created with the session and cleared by
//! `reset`; nothing is global.
//!
//! Mutations happen in short critical sections; no lock is held across an
//! await, so overlapping expansions and probes interleave freely and rely on
//! idempotent merge semantics.

mod collapse;
mod events;
mod expand;
mod oracle;
mod provenance;

pub use collapse::{CollapseOutcome, ToggleOutcome};
pub use events::Notice;
pub use expand::ExpandOutcome;
pub use oracle::ExpandabilityOracle;
pub use provenance::{ExpansionLedger, ExpansionRecord};

use crate::client::NeighbourClient;
use crate::graph::{
    Entity, EntityExtra, EntityId, EntityType, Expandability, GraphSnapshot, GraphStore, Node,
};
use crate::lock;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// The central company a session starts from, supplied by the host page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCompany {
    pub id: String,
    pub name: Option<String>,
    pub risk_level: Option<String>,
}

impl SeedCompany {
    pub fn new(id: impl Into<String>, name: Option<String>, risk_level: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            risk_level,
        }
    }
}

/// Canonical attributes handed to the detail panel when a node is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub label: String,
    pub key: String,
    pub extra: EntityExtra,
}

pub struct Explorer {
    client: Arc<dyn NeighbourClient>,
    store: Arc<Mutex<GraphStore>>,
    oracle: ExpandabilityOracle,
    ledger: Mutex<ExpansionLedger>,
    notices: Mutex<Vec<Notice>>,
    seed: Mutex<Option<EntityId>>,
}

impl Explorer {
    pub fn new(client: Arc<dyn NeighbourClient>) -> Self {
        let store = Arc::new(Mutex::new(GraphStore::new()));
        Self {
            oracle: ExpandabilityOracle::new(client.clone(), store.clone()),
            client,
            store,
            ledger: Mutex::new(ExpansionLedger::new()),
            notices: Mutex::new(Vec::new()),
            seed: Mutex::new(None),
        }
    }

    pub(crate) fn lock_store(&self) -> MutexGuard<'_, GraphStore> {
        lock(&self.store)
    }

    pub(crate) fn lock_ledger(&self) -> MutexGuard<'_, ExpansionLedger> {
        lock(&self.ledger)
    }

    fn notify(&self, notice: Notice) {
        debug!(%notice, "notice");
        lock(&self.notices).push(notice);
    }

    /// Start a fresh graph holding only the central company.
    pub fn seed(&self, seed: SeedCompany) -> EntityId {
        self.reset();
        let entity = Entity::company(seed.id, seed.name, seed.risk_level);
        let id = entity.id();
        self.lock_store().merge(entity);
        *lock(&self.seed) = Some(id.clone());
        id
    }

    /// Initial load: enrich the seed company, then expand it.
    pub async fn start(&self) -> ExpandOutcome {
        let seed = lock(&self.seed).clone();
        let Some((entity_type, key)) = seed.as_ref().and_then(|id| id.parts()) else {
            return ExpandOutcome::UnknownSource;
        };
        self.enrich(key).await;
        self.expand(entity_type, key, true).await
    }

    /// Enrich an entity and expand it again to pick up refreshed fields.
    ///
    /// Runs as a background expansion: no notices.
    pub async fn refresh(&self, id: &EntityId) -> ExpandOutcome {
        let Some((entity_type, key)) = id.parts() else {
            return ExpandOutcome::UnknownSource;
        };
        self.enrich(key).await;
        self.expand(entity_type, key, false).await
    }

    /// Fire the backend enrichment trigger. Failures are swallowed.
    pub async fn enrich(&self, key: &str) {
        if let Err(e) = self.client.enrich(key).await {
            debug!(key, error = %e, "enrichment failed");
        }
    }

    /// Drop every node, edge, verdict, record and notice.
    pub fn reset(&self) {
        self.lock_store().clear();
        self.oracle.clear();
        self.lock_ledger().clear();
        lock(&self.notices).clear();
        *lock(&self.seed) = None;
    }

    /// Drain the notices produced since the last call.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.notices))
    }

    /// The selected node's attributes for the detail panel
    pub fn select(&self, id: &EntityId) -> Option<Selection> {
        self.lock_store().node(id).map(|node| Selection {
            entity_type: node.entity.entity_type,
            label: node.entity.label.clone(),
            key: node.entity.key.clone(),
            extra: node.entity.extra.clone(),
        })
    }

    /// Current nodes and edges for the renderer
    pub fn snapshot(&self) -> GraphSnapshot {
        self.lock_store().snapshot()
    }

    /// Run a read-only closure against the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&GraphStore) -> R) -> R {
        f(&self.lock_store())
    }

    /// Expandable nodes that have not been expanded yet, sorted by identity
    pub fn frontier(&self) -> Vec<EntityId> {
        let ledger = self.lock_ledger();
        let store = self.lock_store();
        let mut ids: Vec<EntityId> = store
            .nodes()
            .filter(|n| n.expandability.is_expandable() && !ledger.is_expanded(&n.id))
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn seed_id(&self) -> Option<EntityId> {
        lock(&self.seed).clone()
    }

    pub fn has(&self, id: &EntityId) -> bool {
        self.lock_store().has(id)
    }

    pub fn node(&self, id: &EntityId) -> Option<Node> {
        self.lock_store().node(id).cloned()
    }

    pub fn expandability(&self, id: &EntityId) -> Option<Expandability> {
        self.lock_store().node(id).map(|n| n.expandability)
    }

    pub fn is_expanded(&self, id: &EntityId) -> bool {
        self.lock_ledger().is_expanded(id)
    }

    /// A copy of the expansion record of an expanded entity
    pub fn record(&self, id: &EntityId) -> Option<ExpansionRecord> {
        self.lock_ledger().get(id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.lock_store().node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.lock_store().edge_count()
    }

    pub fn oracle(&self) -> &ExpandabilityOracle {
        &self.oracle
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("seed", &self.seed_id())
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("expanded", &self.lock_ledger().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockClient;
    use serde_json::json;

    #[test]
    fn seed_creates_single_company() {
        let explorer = Explorer::new(Arc::new(MockClient::new()));
        let id = explorer.seed(SeedCompany::new("583360h", Some("Acme BV".into()), Some("M".into())));

        assert_eq!(explorer.node_count(), 1);
        assert_eq!(explorer.seed_id(), Some(id.clone()));
        let node = explorer.node(&id).unwrap();
        assert_eq!(node.entity.label, "Acme BV");
        assert_eq!(node.expandability, Expandability::Unprobed);
        assert_eq!(node.decoration.badge.as_deref(), Some("M"));
    }

    #[test]
    fn reseeding_replaces_the_session() {
        let explorer = Explorer::new(Arc::new(MockClient::new()));
        explorer.seed(SeedCompany::new("1", None, None));
        let second = explorer.seed(SeedCompany::new("2", None, None));
        assert_eq!(explorer.node_count(), 1);
        assert!(explorer.has(&second));
    }

    #[test]
    fn select_returns_canonical_attributes() {
        let explorer = Explorer::new(Arc::new(MockClient::new()));
        let id = explorer.seed(SeedCompany::new("1", Some("Acme".into()), None));

        let selection = explorer.select(&id).unwrap();
        assert_eq!(selection.entity_type, EntityType::Company);
        assert_eq!(selection.key, "1");
        assert_eq!(selection.label, "Acme");
        assert!(matches!(selection.extra, EntityExtra::Company(_)));
        assert!(explorer.select(&EntityId::from("Company:none")).is_none());
    }

    #[tokio::test]
    async fn start_enriches_then_expands_seed() {
        let client = Arc::new(MockClient::new().with_neighbours(
            EntityType::Company,
            "1",
            vec![json!({"result": {"address_key": null}})],
        ));
        let explorer = Explorer::new(client.clone());
        explorer.seed(SeedCompany::new("1", None, None));

        let outcome = explorer.start().await;

        assert_eq!(outcome.added_node_count(), 1);
        assert_eq!(client.enrich_calls(), vec!["1".to_string()]);
        assert!(explorer.has(&EntityId::from("Address:unknown_address")));
    }

    #[tokio::test]
    async fn start_without_seed_does_nothing() {
        let client = Arc::new(MockClient::new());
        let explorer = Explorer::new(client.clone());
        assert_eq!(explorer.start().await, ExpandOutcome::UnknownSource);
        assert_eq!(client.total_calls(), 0);
    }

    #[tokio::test]
    async fn reset_clears_all_session_state() {
        let client = Arc::new(MockClient::new().with_neighbours(
            EntityType::Company,
            "1",
            vec![json!({"manager_key": "1|A"})],
        ));
        let explorer = Explorer::new(client.clone());
        let id = explorer.seed(SeedCompany::new("1", None, None));
        explorer.expand(EntityType::Company, "1", true).await;
        explorer.expand(EntityType::Manager, "1|A", true).await;

        explorer.reset();

        assert_eq!(explorer.node_count(), 0);
        assert!(!explorer.is_expanded(&id));
        assert!(explorer.oracle().cached(&id).is_none());
        assert!(explorer.take_notices().is_empty());
        assert!(explorer.seed_id().is_none());
    }

    #[tokio::test]
    async fn frontier_lists_expandable_unexpanded_nodes() {
        let client = Arc::new(
            MockClient::new()
                .with_neighbours(EntityType::Company, "1", vec![json!({"manager_key": "1|A"})])
                .with_neighbours(
                    EntityType::Manager,
                    "1|A",
                    vec![json!({"result": "{\"company_id\": \"2\"}"})],
                ),
        );
        let explorer = Explorer::new(client);
        explorer.seed(SeedCompany::new("1", None, None));
        explorer.expand(EntityType::Company, "1", true).await;

        assert_eq!(explorer.frontier(), vec![EntityId::from("Manager:1|A")]);
    }

    #[tokio::test]
    async fn refresh_reexpands_silently() {
        let client = Arc::new(MockClient::new());
        let explorer = Explorer::new(client.clone());
        let id = explorer.seed(SeedCompany::new("1", None, None));

        assert_eq!(explorer.refresh(&id).await, ExpandOutcome::NoConnections);
        assert_eq!(client.enrich_calls(), vec!["1".to_string()]);
        assert!(explorer.take_notices().is_empty());
    }
}
