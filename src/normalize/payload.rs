//! Decoding raw neighbour records into a tagged payload
//!
//! The backend returns neighbours in several shapes: wrapped under
//! `connected` or `result`, as a JSON-encoded "glance" string for companies,
//! or as a plain node object for addresses and managers. `Payload::decode`
//! is the single place that tells them apart.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Marker the backend leaves in place of a missing address
const NONE_TYPE_MARKER: &str = "NoneType";

/// Errors raised while decoding a neighbour record
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("invalid glance JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An address node record
#[derive(Debug, Clone, PartialEq)]
pub struct AddressPayload {
    /// `None` when the backend has no usable address
    pub address_key: Option<String>,
}

/// A manager node record (`<date>|<name>`)
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerPayload {
    pub manager_key: String,
}

/// A company record, either a parsed glance or a flat object
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompanyPayload {
    #[serde(deserialize_with = "scalar_string")]
    pub company_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub deleted: Option<bool>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_file: Option<String>,
    #[serde(default)]
    pub missing_years: Option<Value>,
    #[serde(default)]
    pub profit_loss: Option<Value>,
}

/// Every shape a neighbour record can take
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Address(AddressPayload),
    Manager(ManagerPayload),
    Company(CompanyPayload),
    Unrecognized,
}

impl Payload {
    /// Decode one raw neighbour record.
    ///
    /// Shapes that are simply not neighbours decode to `Unrecognized`;
    /// records that look like a known shape but cannot be read are errors.
    pub fn decode(raw: &Value) -> Result<Self, NormalizeError> {
        match unwrap_envelope(raw) {
            Value::String(glance) => Self::decode_glance(glance),
            Value::Object(map) => {
                if let Some(key) = map.get("address_key") {
                    return Ok(Self::Address(AddressPayload {
                        address_key: address_key(key),
                    }));
                }
                if let Some(Value::String(key)) = map.get("manager_key") {
                    if !key.is_empty() {
                        return Ok(Self::Manager(ManagerPayload {
                            manager_key: key.clone(),
                        }));
                    }
                }
                if map.get("company_id").is_some_and(is_truthy) {
                    let company = CompanyPayload::deserialize(Value::Object(map.clone()))?;
                    return Ok(Self::Company(company));
                }
                Ok(Self::Unrecognized)
            }
            _ => Ok(Self::Unrecognized),
        }
    }

    fn decode_glance(glance: &str) -> Result<Self, NormalizeError> {
        if glance.contains(NONE_TYPE_MARKER) {
            return Ok(Self::Address(AddressPayload { address_key: None }));
        }
        let parsed: Value = serde_json::from_str(glance)?;
        match parsed.get("company_id") {
            Some(id) if is_truthy(id) => Ok(Self::Company(CompanyPayload::deserialize(parsed)?)),
            _ => Err(NormalizeError::Malformed(
                "glance has no company_id".to_string(),
            )),
        }
    }
}

/// The record under `connected`, else under `result`, else the record itself
fn unwrap_envelope(raw: &Value) -> &Value {
    ["connected", "result"]
        .iter()
        .filter_map(|k| raw.get(k))
        .find(|v| !v.is_null())
        .unwrap_or(raw)
}

fn address_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() || s.contains(NONE_TYPE_MARKER) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accept company ids sent as either strings or numbers
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Display fields: numbers are stringified, other shapes read as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Flags sent as booleans or 0/1
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64() != Some(0.0)),
        _ => None,
    })
}
