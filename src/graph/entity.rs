//! Entity representation: the typed payload behind every graph node

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Key used for addresses the backend could not resolve
pub const UNKNOWN_ADDRESS_KEY: &str = "unknown_address";

/// Label shown for the unknown address
pub const UNKNOWN_ADDRESS_LABEL: &str = "Address unknown";

/// Kind of entity a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Company,
    Manager,
    Address,
    Unknown,
}

impl EntityType {
    /// Name used on the wire and in identities (e.g. "Company")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Manager => "Manager",
            Self::Address => "Address",
            Self::Unknown => "Unknown",
        }
    }

    /// Lowercase render group (e.g. "company")
    pub fn group(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Manager => "manager",
            Self::Address => "address",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "manager" => Ok(Self::Manager),
            "address" => Ok(Self::Address),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown entity type: {}", other)),
        }
    }
}

/// Canonical node identity: `<type>:<key>`
///
/// Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(entity_type: EntityType, key: &str) -> Self {
        Self(format!("{}:{}", entity_type.as_str(), key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the identity back into type and key.
    ///
    /// Only the first `:` separates the two, so keys may contain colons.
    pub fn parts(&self) -> Option<(EntityType, &str)> {
        let (ty, key) = self.0.split_once(':')?;
        let ty = ty.parse().ok()?;
        Some((ty, key))
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Attributes carried by company entities
///
/// Numeric fields are kept as raw JSON values; formatting them is the
/// renderer's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyExtra {
    pub company_id: String,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_years: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<serde_json::Value>,
}

impl CompanyExtra {
    /// Overlay the fields present in `update`, keeping the rest.
    pub fn refresh(&mut self, update: CompanyExtra) {
        if !update.company_id.is_empty() {
            self.company_id = update.company_id;
        }
        if !update.company_name.is_empty() {
            self.company_name = update.company_name;
        }
        if update.risk_level.is_some() {
            self.risk_level = update.risk_level;
        }
        if update.deleted.is_some() {
            self.deleted = update.deleted;
        }
        if update.last_file.is_some() {
            self.last_file = update.last_file;
        }
        if update.missing_years.is_some() {
            self.missing_years = update.missing_years;
        }
        if update.profit_loss.is_some() {
            self.profit_loss = update.profit_loss;
        }
    }

    /// Risk level when it is one of the recognised grades (H, M, L)
    pub fn risk_grade(&self) -> Option<&str> {
        match self.risk_level.as_deref() {
            Some(r @ ("H" | "M" | "L")) => Some(r),
            _ => None,
        }
    }
}

/// Attributes carried by manager entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerExtra {
    /// Birth-date prefix of the manager key
    pub date: String,
}

/// Type-specific entity attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityExtra {
    Company(CompanyExtra),
    Manager(ManagerExtra),
    #[default]
    None,
}

/// A normalized entity, as produced from a backend payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub extra: EntityExtra,
}

impl Entity {
    pub fn new(entity_type: EntityType, key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            entity_type,
            key: key.into(),
            label: label.into(),
            extra: EntityExtra::None,
        }
    }

    /// Build a company entity; the display name falls back to the id.
    pub fn company(id: impl Into<String>, name: Option<String>, risk_level: Option<String>) -> Self {
        let id = id.into();
        let name = name.filter(|n| !n.is_empty()).unwrap_or_else(|| id.clone());
        Self {
            entity_type: EntityType::Company,
            key: id.clone(),
            label: name.clone(),
            extra: EntityExtra::Company(CompanyExtra {
                company_id: id,
                company_name: name,
                risk_level: risk_level.filter(|r| !r.is_empty()),
                ..Default::default()
            }),
        }
    }

    pub fn unknown_address() -> Self {
        Self::new(EntityType::Address, UNKNOWN_ADDRESS_KEY, UNKNOWN_ADDRESS_LABEL)
    }

    pub fn with_extra(mut self, extra: EntityExtra) -> Self {
        self.extra = extra;
        self
    }

    pub fn id(&self) -> EntityId {
        EntityId::new(self.entity_type, &self.key)
    }

    pub fn company_extra(&self) -> Option<&CompanyExtra> {
        match &self.extra {
            EntityExtra::Company(extra) => Some(extra),
            _ => None,
        }
    }

    pub fn manager_extra(&self) -> Option<&ManagerExtra> {
        match &self.extra {
            EntityExtra::Manager(extra) => Some(extra),
            _ => None,
        }
    }
}
