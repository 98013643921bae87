//! Relnet: incremental company relationship graph explorer
//!
//! Starts from one company and grows a graph of companies, managers and
//! addresses on demand, one neighbour query at a time.
//!
//! # Core Concepts
//!
//! - **Entities**: typed `(type, key)` pairs decoded from heterogeneous backend records
//! - **Expansion**: merge an entity's neighbours into the graph and remember what was added
//! - **Expandability**: whether expanding a node would reveal anything new, probed lazily
//! - **Collapse**: undo an expansion without removing nodes other expansions still reach
//!
//! # Example
//!
//! ```
//! use relnet::{Explorer, MockClient, SeedCompany};
//! use std::sync::Arc;
//!
//! let explorer = Explorer::new(Arc::new(MockClient::new()));
//! explorer.seed(SeedCompany::new("583360h", Some("Acme BV".into()), None));
//! assert_eq!(explorer.node_count(), 1);
//! ```

pub mod client;
pub mod config;
pub mod explorer;
pub mod graph;
pub mod normalize;

pub use client::{HttpClient, MockClient, NeighbourClient, TransportError};
pub use config::ExplorerConfig;
pub use explorer::{
    CollapseOutcome, ExpandOutcome, Explorer, Notice, Selection, SeedCompany, ToggleOutcome,
};
pub use graph::{
    Decoration, Edge, EdgeId, Entity, EntityExtra, EntityId, EntityType, Expandability,
    GraphSnapshot, GraphStore, Node,
};
pub use normalize::{normalize, normalize_all, NormalizeError, Payload};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
