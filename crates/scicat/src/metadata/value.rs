//! Raw values as read from a hierarchical source, before coercion.

use serde::{Deserialize, Serialize};

/// A value read from a leaf or an attribute of a hierarchical file.
///
/// Scalars and arrays are kept apart because coercion treats them
/// differently: arrays are reduced to a summary scalar unless the caller
/// asks for them to be preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Raw byte string (fixed or variable length ASCII in HDF5 terms).
    Bytes(Vec<u8>),
    Text(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    TextArray(Vec<String>),
}

impl RawValue {
    /// Whether this value is an array (of any length).
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            RawValue::IntArray(_) | RawValue::FloatArray(_) | RawValue::TextArray(_)
        )
    }

    /// Number of elements; scalars count as one.
    pub fn len(&self) -> usize {
        match self {
            RawValue::IntArray(v) => v.len(),
            RawValue::FloatArray(v) => v.len(),
            RawValue::TextArray(v) => v.len(),
            _ => 1,
        }
    }

    /// Whether this is an empty array.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name used in log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::UInt(_) => "uint",
            RawValue::Float(_) => "float",
            RawValue::Bytes(_) => "bytes",
            RawValue::Text(_) => "text",
            RawValue::IntArray(_) => "int array",
            RawValue::FloatArray(_) => "float array",
            RawValue::TextArray(_) => "text array",
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Int(i64::from(v))
    }
}

impl From<u64> for RawValue {
    fn from(v: u64) -> Self {
        RawValue::UInt(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<&[u8]> for RawValue {
    fn from(v: &[u8]) -> Self {
        RawValue::Bytes(v.to_vec())
    }
}

impl From<Vec<f64>> for RawValue {
    fn from(v: Vec<f64>) -> Self {
        RawValue::FloatArray(v)
    }
}

impl From<Vec<i64>> for RawValue {
    fn from(v: Vec<i64>) -> Self {
        RawValue::IntArray(v)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(v: Vec<String>) -> Self {
        RawValue::TextArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_len() {
        assert_eq!(RawValue::from(vec![1.0, 2.0, 3.0]).len(), 3);
        assert_eq!(RawValue::from(4.0).len(), 1);
        assert!(RawValue::FloatArray(vec![]).is_empty());
        assert!(!RawValue::from("x").is_array());
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(RawValue::Int(3)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "int", "data": 3}));
    }
}
