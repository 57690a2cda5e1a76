//! Typed custom properties

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Custom properties keyed by name
pub type Properties = BTreeMap<String, PropertyValue>;

/// A custom property value, tagged with its Tiled type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Color in Tiled's `#aarrggbb` notation (may be empty)
    Color(String),
    /// Path relative to the tileset file
    File(String),
    /// Object id, 0 = none
    Object(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePropertyError {
    #[error("unsupported property type '{0}'")]
    UnsupportedType(String),
    #[error("invalid {kind} value '{value}'")]
    InvalidValue { kind: &'static str, value: String },
}

impl PropertyValue {
    /// Build a value from the `type` and `value` attributes of `<property>`
    pub fn from_tiled(kind: &str, value: &str) -> Result<Self, ParsePropertyError> {
        let invalid = |kind: &'static str| ParsePropertyError::InvalidValue {
            kind,
            value: value.to_string(),
        };

        match kind {
            "" | "string" => Ok(PropertyValue::String(value.to_string())),
            "int" => value
                .parse()
                .map(PropertyValue::Int)
                .map_err(|_| invalid("int")),
            "float" => value
                .parse()
                .map(PropertyValue::Float)
                .map_err(|_| invalid("float")),
            "bool" => match value {
                "true" => Ok(PropertyValue::Bool(true)),
                "false" => Ok(PropertyValue::Bool(false)),
                _ => Err(invalid("bool")),
            },
            "color" => Ok(PropertyValue::Color(value.to_string())),
            "file" => Ok(PropertyValue::File(value.to_string())),
            "object" => value
                .parse()
                .map(PropertyValue::Object)
                .map_err(|_| invalid("object")),
            other => Err(ParsePropertyError::UnsupportedType(other.to_string())),
        }
    }

    /// Tiled type name
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Color(_) => "color",
            PropertyValue::File(_) => "file",
            PropertyValue::Object(_) => "object",
        }
    }

    /// Value as written in the `value` attribute
    pub fn to_tiled_string(&self) -> String {
        match self {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                s.clone()
            }
            PropertyValue::Int(n) => n.to_string(),
            PropertyValue::Float(n) => n.to_string(),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Object(id) => id.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tiled_types() {
        assert_eq!(
            PropertyValue::from_tiled("", "wall").unwrap(),
            PropertyValue::String("wall".to_string())
        );
        assert_eq!(PropertyValue::from_tiled("int", "-3").unwrap().as_int(), Some(-3));
        assert_eq!(
            PropertyValue::from_tiled("bool", "true").unwrap().as_bool(),
            Some(true)
        );
        assert_eq!(
            PropertyValue::from_tiled("object", "12").unwrap(),
            PropertyValue::Object(12)
        );
    }

    #[test]
    fn test_from_tiled_errors() {
        assert!(matches!(
            PropertyValue::from_tiled("int", "x"),
            Err(ParsePropertyError::InvalidValue { kind: "int", .. })
        ));
        assert!(matches!(
            PropertyValue::from_tiled("bool", "yes"),
            Err(ParsePropertyError::InvalidValue { kind: "bool", .. })
        ));
        assert_eq!(
            PropertyValue::from_tiled("class", ""),
            Err(ParsePropertyError::UnsupportedType("class".to_string()))
        );
    }

    #[test]
    fn test_to_tiled_string() {
        assert_eq!(PropertyValue::Float(0.5).to_tiled_string(), "0.5");
        assert_eq!(PropertyValue::Bool(false).to_tiled_string(), "false");
        assert_eq!(PropertyValue::Int(7).type_name(), "int");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(PropertyValue::Int(4)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "int", "value": 4 }));
    }
}
