//! Undirected edge representation

use super::entity::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator between the two endpoint identities of an edge id
const EDGE_SEPARATOR: &str = "<->";

/// Order-independent edge identity: the sorted endpoint ids joined by `<->`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn between(a: &EntityId, b: &EntityId) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}{}{}", lo, EDGE_SEPARATOR, hi))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An undirected relation between two nodes.
///
/// `source` and `target` record the direction of first discovery only;
/// identity ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: EntityId,
    pub target: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(source: EntityId, target: EntityId) -> Self {
        Self {
            id: EdgeId::between(&source, &target),
            source,
            target,
            created_at: Utc::now(),
        }
    }
}
