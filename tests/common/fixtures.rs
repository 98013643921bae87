//! Raw neighbour records in the shapes the backend produces

#![allow(dead_code)]

use relnet::{Explorer, MockClient, SeedCompany};
use serde_json::{json, Value};
use std::sync::Arc;

/// A company neighbour: JSON-encoded glance string under `result`
pub fn glance(id: &str, name: &str, risk: Option<&str>) -> Value {
    let mut glance = json!({"company_id": id, "company_name": name});
    if let Some(risk) = risk {
        glance["risk_level"] = json!(risk);
    }
    json!({"result": glance.to_string()})
}

/// A manager neighbour wrapped under `connected`
pub fn manager(key: &str) -> Value {
    json!({"connected": {"manager_key": key}})
}

/// An address neighbour wrapped under `result`
pub fn address(key: &str) -> Value {
    json!({"result": {"address_key": key}})
}

/// The marker the backend sends when a company has no address
pub fn none_address() -> Value {
    json!({"result": "NoneType"})
}

/// An explorer over `client`, seeded with company `id`
pub fn seeded(client: MockClient, id: &str) -> (Arc<MockClient>, Explorer) {
    let client = Arc::new(client);
    let explorer = Explorer::new(client.clone());
    explorer.seed(SeedCompany::new(id, None, None));
    (client, explorer)
}
