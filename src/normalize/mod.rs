//! Payload normalization
//!
//! Turns one raw backend neighbour record into a canonical [`Entity`], or
//! drops it. A record that cannot be read never affects its siblings.

mod payload;

pub use payload::{AddressPayload, CompanyPayload, ManagerPayload, NormalizeError, Payload};

use crate::graph::{CompanyExtra, Entity, EntityExtra, EntityType, ManagerExtra};
use serde_json::Value;
use tracing::debug;

/// Normalize one neighbour record. Unrecognized or malformed records yield `None`.
pub fn normalize(raw: &Value) -> Option<Entity> {
    match Payload::decode(raw) {
        Ok(payload) => payload.into_entity(),
        Err(e) => {
            debug!(error = %e, "dropping neighbour record");
            None
        }
    }
}

/// Normalize a whole neighbour list, skipping dropped records and empty keys.
pub fn normalize_all(raw: &[Value]) -> Vec<Entity> {
    raw.iter()
        .filter_map(normalize)
        .filter(|e| !e.key.is_empty())
        .collect()
}

impl Payload {
    /// Convert a decoded payload into its canonical entity
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Payload::Address(AddressPayload { address_key: None }) => Some(Entity::unknown_address()),
            Payload::Address(AddressPayload {
                address_key: Some(key),
            }) => Some(Entity::new(EntityType::Address, key.clone(), key)),
            Payload::Manager(m) => Some(manager_entity(m.manager_key)),
            Payload::Company(c) => Some(company_entity(c)),
            Payload::Unrecognized => None,
        }
    }
}

fn manager_entity(key: String) -> Entity {
    let (date, name) = match key.split_once('|') {
        Some((date, name)) => (date.to_string(), name.to_string()),
        None => (key.clone(), String::new()),
    };
    let label = if name.is_empty() { key.clone() } else { name };
    Entity::new(EntityType::Manager, key, label).with_extra(EntityExtra::Manager(ManagerExtra { date }))
}

fn company_entity(c: CompanyPayload) -> Entity {
    let name = c
        .company_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| c.company_id.clone());
    Entity::new(EntityType::Company, c.company_id.clone(), name.clone()).with_extra(
        EntityExtra::Company(CompanyExtra {
            company_id: c.company_id,
            company_name: name,
            risk_level: c.risk_level.filter(|r| !r.is_empty()),
            deleted: c.deleted,
            last_file: c.last_file,
            missing_years: c.missing_years,
            profit_loss: c.profit_loss,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{UNKNOWN_ADDRESS_KEY, UNKNOWN_ADDRESS_LABEL};
    use serde_json::json;

    #[test]
    fn glance_string_becomes_company() {
        let raw = json!({"result": "{\"company_id\":\"123\",\"company_name\":\"Acme\"}"});
        let entity = normalize(&raw).unwrap();
        assert_eq!(entity.entity_type, EntityType::Company);
        assert_eq!(entity.key, "123");
        assert!(entity.label.contains("Acme"));
    }

    #[test]
    fn glance_carries_financial_fields_unmodified() {
        let glance = json!({
            "company_id": "583360h",
            "company_name": "Acme BV",
            "deleted": false,
            "last_file": "2023-06-30",
            "missing_years": 2,
            "profit_loss": -1234.5,
            "risk_level": "H"
        });
        let raw = json!({"result": glance.to_string()});
        let entity = normalize(&raw).unwrap();
        let extra = entity.company_extra().unwrap();
        assert_eq!(extra.deleted, Some(false));
        assert_eq!(extra.last_file.as_deref(), Some("2023-06-30"));
        assert_eq!(extra.missing_years, Some(json!(2)));
        assert_eq!(extra.profit_loss, Some(json!(-1234.5)));
        assert_eq!(extra.risk_level.as_deref(), Some("H"));
    }

    #[test]
    fn oddly_typed_glance_fields_keep_the_company() {
        let glance = json!({
            "company_id": "1",
            "company_name": "A",
            "last_file": 20230630,
            "deleted": 0,
            "risk_level": 2
        });
        let entity = normalize(&json!({"result": glance.to_string()})).unwrap();
        assert_eq!(entity.key, "1");
        let extra = entity.company_extra().unwrap();
        assert_eq!(extra.last_file.as_deref(), Some("20230630"));
        assert_eq!(extra.deleted, Some(false));
        assert_eq!(extra.risk_level.as_deref(), Some("2"));
        assert!(extra.risk_grade().is_none());

        let odd = json!({"company_id": "2", "deleted": "yes", "last_file": [2023]});
        let extra = normalize(&odd).unwrap();
        let extra = extra.company_extra().unwrap();
        assert!(extra.deleted.is_none());
        assert!(extra.last_file.is_none());
    }

    #[test]
    fn null_address_key_is_unknown_address() {
        let entity = normalize(&json!({"address_key": null})).unwrap();
        assert_eq!(entity.entity_type, EntityType::Address);
        assert_eq!(entity.key, UNKNOWN_ADDRESS_KEY);
        assert_eq!(entity.label, UNKNOWN_ADDRESS_LABEL);
    }

    #[test]
    fn address_key_is_its_own_label() {
        let entity = normalize(&json!({"result": {"address_key": "Kerkstraat 1, 1234 AB Utrecht"}}))
            .unwrap();
        assert_eq!(entity.key, "Kerkstraat 1, 1234 AB Utrecht");
        assert_eq!(entity.label, entity.key);
        assert_eq!(entity.extra, EntityExtra::None);
    }

    #[test]
    fn manager_key_splits_date_and_name() {
        let entity = normalize(&json!({"manager_key": "19900101|Jane Doe"})).unwrap();
        assert_eq!(entity.entity_type, EntityType::Manager);
        assert_eq!(entity.key, "19900101|Jane Doe");
        assert_eq!(entity.label, "Jane Doe");
        assert_eq!(entity.manager_extra().unwrap().date, "19900101");
    }

    #[test]
    fn manager_name_keeps_later_separators() {
        let entity = normalize(&json!({"manager_key": "1963-05-06|Van Loon|Jr"})).unwrap();
        assert_eq!(entity.label, "Van Loon|Jr");
        assert_eq!(entity.manager_extra().unwrap().date, "1963-05-06");
    }

    #[test]
    fn manager_without_name_falls_back_to_key() {
        let entity = normalize(&json!({"manager_key": "19900101|"})).unwrap();
        assert_eq!(entity.label, "19900101|");

        let entity = normalize(&json!({"manager_key": "Date of birth is unavailable"})).unwrap();
        assert_eq!(entity.label, "Date of birth is unavailable");
    }

    #[test]
    fn flat_company_defaults_name_to_id() {
        let entity = normalize(&json!({"company_id": "77", "risk_level": ""})).unwrap();
        assert_eq!(entity.label, "77");
        assert!(entity.company_extra().unwrap().risk_level.is_none());
    }

    #[test]
    fn unrecognized_and_broken_records_are_dropped() {
        assert!(normalize(&json!({"unexpected": true})).is_none());
        assert!(normalize(&json!({"result": "{broken"})).is_none());
        assert!(normalize(&json!(null)).is_none());
    }

    #[test]
    fn normalize_all_skips_bad_siblings() {
        let raw = vec![
            json!({"manager_key": "1|A"}),
            json!({"result": "{broken"}),
            json!({"address_key": "B"}),
            json!("stray"),
        ];
        let entities = normalize_all(&raw);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, EntityType::Manager);
        assert_eq!(entities[1].entity_type, EntityType::Address);
    }
}
