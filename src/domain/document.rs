//! Document values
//!
//! A JSON-shaped tree whose containers sit behind `Arc`, so cloning a document
//! is O(1) and an edit only has to copy the containers along its path.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Object contents, keyed by field name
pub type DocumentMap = BTreeMap<String, DocumentValue>;

/// A document instance (or any subtree of one)
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DocumentValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Arc<Vec<DocumentValue>>),
    Object(Arc<DocumentMap>),
}

impl DocumentValue {
    pub fn empty_object() -> Self {
        DocumentValue::Object(Arc::new(DocumentMap::new()))
    }

    pub fn empty_array() -> Self {
        DocumentValue::Array(Arc::new(Vec::new()))
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, DocumentValue)>,
        K: Into<String>,
    {
        DocumentValue::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn array<I: IntoIterator<Item = DocumentValue>>(items: I) -> Self {
        DocumentValue::Array(Arc::new(items.into_iter().collect()))
    }

    /// A number from an `f64`; integral values become integer numbers so
    /// `1.0` compares equal to the JSON literal `1`.
    pub fn number(n: f64) -> Self {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            DocumentValue::Number(Number::from(n as i64))
        } else {
            Number::from_f64(n)
                .map(DocumentValue::Number)
                .unwrap_or(DocumentValue::Null)
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            DocumentValue::Null => "null",
            DocumentValue::Bool(_) => "boolean",
            DocumentValue::Number(_) => "number",
            DocumentValue::String(_) => "string",
            DocumentValue::Array(_) => "array",
            DocumentValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DocumentValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocumentValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocumentValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocumentValue]> {
        match self {
            DocumentValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DocumentMap> {
        match self {
            DocumentValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up an object field
    pub fn get_field(&self, name: &str) -> Option<&DocumentValue> {
        self.as_object().and_then(|map| map.get(name))
    }

    /// Look up an array element
    pub fn get_index(&self, idx: usize) -> Option<&DocumentValue> {
        self.as_array().and_then(|items| items.get(idx))
    }

    /// True when both values are the same shared container (or equal scalars)
    pub fn shares_with(&self, other: &DocumentValue) -> bool {
        match (self, other) {
            (DocumentValue::Array(a), DocumentValue::Array(b)) => Arc::ptr_eq(a, b),
            (DocumentValue::Object(a), DocumentValue::Object(b)) => Arc::ptr_eq(a, b),
            (a, b) => a == b,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::from(self)
    }
}

impl From<Value> for DocumentValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DocumentValue::Null,
            Value::Bool(b) => DocumentValue::Bool(b),
            Value::Number(n) => DocumentValue::Number(n),
            Value::String(s) => DocumentValue::String(s),
            Value::Array(items) => {
                DocumentValue::Array(Arc::new(items.into_iter().map(Into::into).collect()))
            }
            Value::Object(map) => DocumentValue::Object(Arc::new(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            )),
        }
    }
}

impl From<&DocumentValue> for Value {
    fn from(value: &DocumentValue) -> Self {
        match value {
            DocumentValue::Null => Value::Null,
            DocumentValue::Bool(b) => Value::Bool(*b),
            DocumentValue::Number(n) => Value::Number(n.clone()),
            DocumentValue::String(s) => Value::String(s.clone()),
            DocumentValue::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            DocumentValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for DocumentValue {
    fn from(s: &str) -> Self {
        DocumentValue::String(s.to_string())
    }
}

impl From<String> for DocumentValue {
    fn from(s: String) -> Self {
        DocumentValue::String(s)
    }
}

impl From<i64> for DocumentValue {
    fn from(n: i64) -> Self {
        DocumentValue::Number(Number::from(n))
    }
}

impl From<bool> for DocumentValue {
    fn from(b: bool) -> Self {
        DocumentValue::Bool(b)
    }
}

impl PartialEq<Value> for DocumentValue {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (DocumentValue::Null, Value::Null) => true,
            (DocumentValue::Bool(a), Value::Bool(b)) => a == b,
            (DocumentValue::Number(a), Value::Number(b)) => a == b,
            (DocumentValue::String(a), Value::String(b)) => a == b,
            (DocumentValue::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            (DocumentValue::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|other| v == other))
            }
            _ => false,
        }
    }
}

impl Serialize for DocumentValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DocumentValue::Null => serializer.serialize_unit(),
            DocumentValue::Bool(b) => serializer.serialize_bool(*b),
            DocumentValue::Number(n) => n.serialize(serializer),
            DocumentValue::String(s) => serializer.serialize_str(s),
            DocumentValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DocumentValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for DocumentValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(DocumentValue::from)
    }
}

// ============================================================================
// Tests
// ============================================================================
