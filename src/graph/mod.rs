//! Core graph data structures

mod edge;
mod entity;
mod node;
mod store;

#[cfg(test)]
mod tests;

pub use edge::{Edge, EdgeId};
pub use entity::{
    CompanyExtra, Entity, EntityExtra, EntityId, EntityType, ManagerExtra, UNKNOWN_ADDRESS_KEY,
    UNKNOWN_ADDRESS_LABEL,
};
pub use node::{group_color, Decoration, Expandability, Node};
pub use store::{GraphError, GraphResult, GraphSnapshot, GraphStore, MergeOutcome};
