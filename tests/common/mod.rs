//! Common test utilities for explorer integration tests
//!
//! Builders for the raw neighbour record shapes the backend returns, and a
//! helper for seeding an explorer over a scripted client.

pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{address, glance, manager, none_address, seeded};
