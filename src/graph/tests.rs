//! Store-level properties and serialization fixtures

use serde_json::{json, Value};

/// Snapshot fixture as the renderer expects it
fn snapshot_fixture() -> Value {
    json!({
        "nodes": [{
            "id": "Company:583360h",
            "entity": {
                "type": "Company",
                "key": "583360h",
                "label": "Acme BV",
                "extra": {
                    "kind": "company",
                    "company_id": "583360h",
                    "company_name": "Acme BV",
                    "risk_level": "M",
                    "profit_loss": 12500.5
                }
            },
            "expandability": "expandable",
            "decoration": {
                "group": "company",
                "background": "#1f77b4",
                "border": "#000000",
                "border_width": 4,
                "title": "Company\nName: Acme BV\nID: 583360h",
                "badge": "M"
            },
            "discovered_at": "2025-11-30T10:00:00Z"
        }],
        "edges": []
    })
}

#[cfg(test)]
mod property_tests {
    use crate::graph::{
        CompanyExtra, EdgeId, Entity, EntityExtra, EntityId, EntityType, Expandability,
        GraphSnapshot, GraphStore, ManagerExtra, MergeOutcome,
    };

    fn sample_entities() -> Vec<Entity> {
        vec![
            Entity::company("1", Some("Acme".into()), Some("L".into())),
            Entity::company("2", None, None),
            Entity::new(EntityType::Manager, "19900101|Jane Doe", "Jane Doe")
                .with_extra(EntityExtra::Manager(ManagerExtra { date: "19900101".into() })),
            Entity::new(EntityType::Address, "Main St 1, 1000 Town", "Main St 1, 1000 Town"),
            Entity::unknown_address(),
        ]
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let mut store = GraphStore::new();
        for e in sample_entities() {
            store.merge(e);
        }
        let before = store.snapshot();

        for e in sample_entities() {
            assert_eq!(store.merge(e), MergeOutcome::Unchanged);
        }
        let after = store.snapshot();

        assert_eq!(before.nodes.len(), after.nodes.len());
        for (b, a) in before.nodes.iter().zip(after.nodes.iter()) {
            assert_eq!(b.entity, a.entity);
            assert_eq!(b.decoration, a.decoration);
        }
    }

    #[test]
    fn equal_type_and_key_means_equal_identity() {
        let a = Entity::company("7", Some("First".into()), None);
        let b = Entity::company("7", Some("Second".into()), Some("H".into()));
        assert_eq!(a.id(), b.id());

        let mut store = GraphStore::new();
        store.merge(a);
        store.merge(b);
        assert_eq!(store.node_count(), 1);
        assert!(store.add(Entity::company("7", None, None)).is_err());
    }

    #[test]
    fn same_key_different_type_are_distinct() {
        let mut store = GraphStore::new();
        store.merge(Entity::new(EntityType::Address, "x", "x"));
        store.merge(Entity::new(EntityType::Manager, "x", "x"));
        assert_eq!(store.node_count(), 2);
    }

    #[test]
    fn edge_identity_is_symmetric() {
        let ids: Vec<EntityId> = sample_entities().iter().map(Entity::id).collect();
        for a in &ids {
            for b in &ids {
                assert_eq!(EdgeId::between(a, b), EdgeId::between(b, a));
            }
        }
    }

    #[test]
    fn refresh_only_touches_declared_fields() {
        let mut store = GraphStore::new();
        let mut full = Entity::company("1", Some("Acme".into()), Some("L".into()));
        if let EntityExtra::Company(extra) = &mut full.extra {
            extra.deleted = Some(false);
            extra.last_file = Some("2023-06-30".into());
        }
        store.merge(full);

        store.merge(Entity::company("1", Some("Acme Holding".into()), Some("H".into())));

        let node = store.node(&EntityId::from("Company:1")).unwrap();
        assert_eq!(node.entity.label, "Acme Holding");
        assert_eq!(
            node.entity.company_extra(),
            Some(&CompanyExtra {
                company_id: "1".into(),
                company_name: "Acme Holding".into(),
                risk_level: Some("H".into()),
                deleted: Some(false),
                last_file: Some("2023-06-30".into()),
                missing_years: None,
                profit_loss: None,
            })
        );
        assert_eq!(node.expandability, Expandability::Unprobed);
    }

    #[test]
    fn snapshot_deserializes_from_fixture() {
        let snap: GraphSnapshot = serde_json::from_value(super::snapshot_fixture()).unwrap();
        assert_eq!(snap.nodes.len(), 1);
        let node = &snap.nodes[0];
        assert_eq!(node.id.as_str(), "Company:583360h");
        assert_eq!(node.expandability, Expandability::Expandable);
        assert_eq!(
            node.entity.company_extra().unwrap().profit_loss,
            Some(serde_json::json!(12500.5))
        );
        assert!(node.refreshed_at.is_none());
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut store = GraphStore::new();
        for e in sample_entities() {
            store.merge(e);
        }
        let value = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(value["nodes"][0]["entity"]["type"], "Address");
        assert_eq!(value["nodes"][0]["expandability"], "unprobed");
    }
}
