//! Property values attached to nodes and edges
//!
//! Edge weights and node dates are read from these maps by attribute name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Property value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

impl PropertyValue {
    /// Numeric view used for weights and dates (integers widen to f64)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::Null => "Null",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

/// Property map for node and edge attributes
pub type PropertyMap = HashMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_view() {
        assert_eq!(PropertyValue::Integer(3).as_number(), Some(3.0));
        assert_eq!(PropertyValue::Float(0.25).as_number(), Some(0.25));
        assert_eq!(PropertyValue::from("x").as_number(), None);
        assert_eq!(PropertyValue::Null.as_number(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(PropertyValue::from("hello").type_name(), "String");
        assert_eq!(PropertyValue::from(42i64).type_name(), "Integer");
        assert_eq!(PropertyValue::from(2.5).type_name(), "Float");
        assert_eq!(PropertyValue::Boolean(true).type_name(), "Boolean");
    }

    #[test]
    fn test_untagged_serde() {
        let props: PropertyMap =
            serde_json::from_str(r#"{"date": 5, "weight": 0.5, "kind": "paper"}"#).unwrap();
        assert_eq!(props["date"], PropertyValue::Integer(5));
        assert_eq!(props["weight"], PropertyValue::Float(0.5));
        assert_eq!(props["kind"], PropertyValue::String("paper".to_string()));
    }
}
