//! Front-matter value model.
//!
//! Parsed front-matter is an untyped graph; [`MetaValue`] makes its shape explicit so the
//! tree flattening can pattern-match on it. Mapping entries keep document order.

use crate::error::ApiError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A front-matter value: nothing, a leaf, a list or a keyed mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetaValue {
    #[default]
    Null,
    Scalar(Scalar),
    Sequence(Vec<MetaValue>),
    Mapping(Vec<(String, MetaValue)>),
}

impl MetaValue {
    pub fn string(text: impl Into<String>) -> Self {
        MetaValue::Scalar(Scalar::String(text.into()))
    }

    /// Parse a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str::<Value>(raw)
            .map(MetaValue::from)
            .map_err(|e| ApiError::InvalidMetadata(e.to_string()))
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ApiError> {
        toml::from_str::<Value>(raw)
            .map(MetaValue::from)
            .map_err(|e| ApiError::InvalidMetadata(e.to_string()))
    }

    /// Sequences and mappings have children in the tree.
    pub fn is_composite(&self) -> bool {
        matches!(self, MetaValue::Sequence(_) | MetaValue::Mapping(_))
    }

    /// Text shown for a leaf; empty for null and composites.
    pub fn display_text(&self) -> String {
        match self {
            MetaValue::Scalar(scalar) => scalar.to_string(),
            _ => String::new(),
        }
    }

    /// Value of a top-level mapping key.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        match self {
            MetaValue::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            MetaValue::Null => Value::Null,
            MetaValue::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            MetaValue::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            MetaValue::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            MetaValue::Sequence(items) => Value::Array(items.iter().map(MetaValue::to_json).collect()),
            MetaValue::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<Value> for MetaValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => MetaValue::Scalar(Scalar::Number(n)),
            Value::String(s) => MetaValue::Scalar(Scalar::String(s)),
            Value::Array(items) => MetaValue::Sequence(items.into_iter().map(MetaValue::from).collect()),
            Value::Object(fields) => {
                MetaValue::Mapping(fields.into_iter().map(|(k, v)| (k, MetaValue::from(v))).collect())
            }
        }
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MetaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(MetaValue::from)
    }
}
