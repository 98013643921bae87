//! Mock backend for testing: returns scripted neighbour lists.

use super::{NeighbourClient, TransportError};
use crate::lock;
use crate::graph::{EntityId, EntityType};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A scripted reply for one entity
#[derive(Debug, Clone)]
pub enum MockReply {
    Neighbours(Vec<Value>),
    Failure(TransportError),
}

/// Mock client with scripted replies, optional per-entity latency and call
/// counters.
///
/// Entities without a scripted reply have no neighbours.
#[derive(Debug, Default)]
pub struct MockClient {
    replies: Mutex<HashMap<EntityId, MockReply>>,
    latency: Mutex<HashMap<EntityId, Duration>>,
    calls: Mutex<HashMap<EntityId, usize>>,
    enrich_calls: Mutex<Vec<String>>,
    enrich_fails: bool,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the neighbour list for an entity.
    pub fn with_neighbours(self, entity_type: EntityType, key: &str, neighbours: Vec<Value>) -> Self {
        self.set_neighbours(entity_type, key, neighbours);
        self
    }

    /// Register a transport failure for an entity.
    pub fn with_failure(self, entity_type: EntityType, key: &str, error: TransportError) -> Self {
        lock(&self.replies).insert(EntityId::new(entity_type, key), MockReply::Failure(error));
        self
    }

    /// Delay every reply for an entity.
    pub fn with_latency(self, entity_type: EntityType, key: &str, latency: Duration) -> Self {
        lock(&self.latency).insert(EntityId::new(entity_type, key), latency);
        self
    }

    /// Make every enrichment call fail.
    pub fn with_failing_enrichment(mut self) -> Self {
        self.enrich_fails = true;
        self
    }

    /// Replace the neighbour list for an entity (e.g. to simulate enrichment).
    pub fn set_neighbours(&self, entity_type: EntityType, key: &str, neighbours: Vec<Value>) {
        lock(&self.replies).insert(EntityId::new(entity_type, key), MockReply::Neighbours(neighbours));
    }

    /// Number of neighbour queries issued for an entity
    pub fn calls(&self, entity_type: EntityType, key: &str) -> usize {
        lock(&self.calls)
            .get(&EntityId::new(entity_type, key))
            .copied()
            .unwrap_or(0)
    }

    /// Number of neighbour queries issued overall
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Keys passed to `enrich`, in call order
    pub fn enrich_calls(&self) -> Vec<String> {
        lock(&self.enrich_calls).clone()
    }
}

#[async_trait]
impl NeighbourClient for MockClient {
    async fn neighbours(
        &self,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Vec<Value>, TransportError> {
        let id = EntityId::new(entity_type, key);
        *lock(&self.calls).entry(id.clone()).or_default() += 1;

        let delay = lock(&self.latency).get(&id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = lock(&self.replies).get(&id).cloned();
        match reply {
            Some(MockReply::Neighbours(neighbours)) => Ok(neighbours),
            Some(MockReply::Failure(error)) => Err(error),
            None => Ok(Vec::new()),
        }
    }

    async fn enrich(&self, key: &str) -> Result<(), TransportError> {
        lock(&self.enrich_calls).push(key.to_string());
        if self.enrich_fails {
            return Err(TransportError::Network("mock enrichment failure".to_string()));
        }
        Ok(())
    }
}
