// Request values

use crate::{ConfigurationError, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// A single input value as seen by rule checks.
///
/// `Missing` never lives inside a [`Request`]; it is what checks receive for a
/// field the request does not carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Missing,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<FieldValue>),
    Object(IndexMap<String, FieldValue>),
}

static MISSING: FieldValue = FieldValue::Missing;

impl FieldValue {
    /// True for `Missing` and `Null`
    pub fn is_nil(&self) -> bool {
        matches!(self, FieldValue::Missing | FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view: numbers directly, strings when they parse as a finite float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Length used by size rules: characters, elements or entries
    pub fn size(&self) -> Option<usize> {
        match self {
            FieldValue::String(s) => Some(s.chars().count()),
            FieldValue::Array(items) => Some(items.len()),
            FieldValue::Object(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// String form of a scalar, as a query string would have carried it
    pub fn to_scalar_string(&self) -> Option<String> {
        match self {
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Short name of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Missing => "missing",
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::String(_) => "string",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Missing => Ok(()),
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Array(items) => write!(f, "[{} items]", items.len()),
            FieldValue::Object(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    /// Non-finite floats have no JSON form and become `Null`
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Field values of one request, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    values: IndexMap<String, FieldValue>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert a value. Inserting `Missing` removes the field.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        let field = field.into();
        match value.into() {
            FieldValue::Missing => {
                self.values.shift_remove(&field);
            }
            value => {
                self.values.insert(field, value);
            }
        }
    }

    /// Whether the request carries the field at all (`null` counts)
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Value for a field, `Missing` when absent
    pub fn get(&self, field: &str) -> &FieldValue {
        self.values.get(field).unwrap_or(&MISSING)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build from already-decoded query or form pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), FieldValue::String(v.into())))
            .collect()
    }

    /// Build from a decoded JSON document, which must be an object
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ConfigurationError::InvalidRequest(format!(
                "expected a JSON object, got {}",
                FieldValue::from(other).kind()
            ))),
        }
    }

    /// Parse a JSON object body
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ConfigurationError::InvalidRequest(format!("Invalid JSON: {}", e)))?;
        Self::from_json(value)
    }

    /// Parse a JSON object body from raw bytes
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ConfigurationError::InvalidRequest(format!("Invalid JSON: {}", e)))?;
        Self::from_json(value)
    }

    /// Build from a serializable struct using its serde field names
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        let value = serde_json::to_value(data)
            .map_err(|e| ConfigurationError::InvalidRequest(e.to_string()))?;
        Self::from_json(value)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Request {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Request::new();
        for (field, value) in iter {
            request.insert(field, value);
        }
        request
    }
}
