//! Node representation in the relationship graph

use super::entity::{Entity, EntityExtra, EntityId, EntityType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether expanding a node would reveal anything new
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expandability {
    /// Not probed yet
    #[default]
    Unprobed,
    Expandable,
    NotExpandable,
}

impl Expandability {
    pub fn is_expandable(&self) -> bool {
        matches!(self, Self::Expandable)
    }
}

impl From<bool> for Expandability {
    fn from(expandable: bool) -> Self {
        if expandable {
            Self::Expandable
        } else {
            Self::NotExpandable
        }
    }
}

/// Border colour applied to expandable nodes
const EXPANDABLE_BORDER: &str = "#000000";
const EXPANDABLE_BORDER_WIDTH: u32 = 4;
const DEFAULT_BORDER_WIDTH: u32 = 1;

/// Background colour of a render group
pub fn group_color(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Company => "#1f77b4",
        EntityType::Manager => "#ff7f0e",
        EntityType::Address => "#2ca02c",
        EntityType::Unknown => "#7f7f7f",
    }
}

/// Visual hints handed to the renderer alongside the node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub group: String,
    pub background: String,
    pub border: String,
    pub border_width: u32,
    /// Tooltip text
    pub title: String,
    /// Company risk grade shown under the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Decoration {
    pub fn for_entity(entity: &Entity) -> Self {
        let background = group_color(entity.entity_type).to_string();
        Self {
            group: entity.entity_type.group().to_string(),
            border: background.clone(),
            background,
            border_width: DEFAULT_BORDER_WIDTH,
            title: tooltip(entity),
            badge: entity
                .company_extra()
                .and_then(|c| c.risk_grade())
                .map(str::to_string),
        }
    }

    fn set_expandable(&mut self, expandable: bool) {
        if expandable {
            self.border = EXPANDABLE_BORDER.to_string();
            self.border_width = EXPANDABLE_BORDER_WIDTH;
        } else {
            self.border = self.background.clone();
            self.border_width = DEFAULT_BORDER_WIDTH;
        }
    }
}

fn tooltip(entity: &Entity) -> String {
    match &entity.extra {
        EntityExtra::Company(c) => {
            format!("Company\nName: {}\nID: {}", c.company_name, entity.key)
        }
        EntityExtra::Manager(m) if !m.date.is_empty() => {
            format!("Manager\nName: {}\nDOB: {}", entity.label, m.date)
        }
        _ => match entity.entity_type {
            EntityType::Manager => format!("Manager\nName: {}", entity.label),
            EntityType::Address => format!("Address\n{}", entity.label),
            other => format!("{}\n{}", other, entity.label),
        },
    }
}

/// A materialized node: the entity plus its graph-side state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    pub entity: Entity,
    pub expandability: Expandability,
    pub decoration: Decoration,
    pub discovered_at: DateTime<Utc>,
    /// Last time a merge changed the entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Node {
    pub fn new(entity: Entity) -> Self {
        Self {
            id: entity.id(),
            decoration: Decoration::for_entity(&entity),
            entity,
            expandability: Expandability::Unprobed,
            discovered_at: Utc::now(),
            refreshed_at: None,
        }
    }

    /// Apply a rediscovered entity. Returns true if anything changed.
    ///
    /// Only companies carry refreshable fields; other types are left as-is.
    pub fn refresh(&mut self, update: Entity) -> bool {
        let EntityExtra::Company(incoming) = update.extra else {
            return false;
        };
        let before = (self.entity.label.clone(), self.entity.extra.clone());

        match &mut self.entity.extra {
            EntityExtra::Company(existing) => existing.refresh(incoming),
            other => *other = EntityExtra::Company(incoming),
        }
        if !update.label.is_empty() {
            self.entity.label = update.label;
        }

        let changed = before != (self.entity.label.clone(), self.entity.extra.clone());
        if changed {
            let expandable = self.expandability.is_expandable();
            self.decoration = Decoration::for_entity(&self.entity);
            self.decoration.set_expandable(expandable);
            self.refreshed_at = Some(Utc::now());
        }
        changed
    }

    /// Record an expandability verdict and update the border to match.
    pub fn set_expandability(&mut self, expandable: bool) {
        self.expandability = expandable.into();
        self.decoration.set_expandable(expandable);
    }
}
