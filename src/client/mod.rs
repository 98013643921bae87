//! Backend client: the transport seam for neighbour queries and enrichment
//!
//! Two implementations:
//! - `HttpClient`: talks to the network and enrichment endpoints over HTTP (production)
//! - `MockClient`: returns scripted neighbour lists (testing)

mod http;
mod mock;

pub use http::HttpClient;
pub use mock::{MockClient, MockReply};

use crate::graph::EntityType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a neighbour query response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeighbourResponse {
    /// Raw neighbour records, one per connected node
    #[serde(default)]
    pub neighbours: Vec<Value>,
}

/// Errors from backend calls.
///
/// Callers recover from all of these locally; none reach the user.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("response decode error: {0}")]
    Decode(String),
}

/// Client trait for the backend.
///
/// Abstracts over transport so the explorer does not depend on how the
/// backend is reached.
#[async_trait]
pub trait NeighbourClient: Send + Sync {
    /// Fetch the raw neighbour records of one entity.
    async fn neighbours(
        &self,
        entity_type: EntityType,
        key: &str,
    ) -> Result<Vec<Value>, TransportError>;

    /// Ask the backend to refresh data around an entity (e.g. risk scoring).
    async fn enrich(&self, key: &str) -> Result<(), TransportError>;
}
