use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single scalar value in a parsed or normalized row.
///
/// Pre-schema, every value is a `String` (§3: "Row. A mapping from field
/// name to string (pre-normalization) or coerced scalar (post-schema)").
/// Schema coercion (§4.4) turns declared fields into `Int`/`Float`/`Bool`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ScalarValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int(i) => Some(*i),
            ScalarValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Int(i) => Some(*i as f64),
            ScalarValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "{s}"),
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x}"),
            ScalarValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Int(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        ScalarValue::Float(f)
    }
}

/// A single parsed/normalized row. Keys are always lowercase (§3 invariant 1,
/// §8 property 1). `BTreeMap` gives deterministic iteration and serialization
/// order, which matters for §8 property 3 (byte-identical envelopes for
/// identical input).
pub type Row = BTreeMap<String, ScalarValue>;

/// Lowercase every key of a freshly parsed row in place.
pub fn lowercase_keys(row: &BTreeMap<String, ScalarValue>) -> Row {
    row.iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}
