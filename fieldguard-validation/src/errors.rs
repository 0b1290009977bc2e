// Validation errors

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use thiserror::Error;

/// Result type for validator setup and execution
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Programmer mistakes that abort a validation call.
///
/// These never describe user input. A call that hits one of them produces no
/// partial [`ErrorBag`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No field rules were supplied
    #[error("fieldguard: no validation rules were provided")]
    EmptyRules,

    /// Request values were never attached to the validator
    #[error("fieldguard: request values are not set")]
    MissingRequest,

    /// A declared rule name has no registered check
    #[error("fieldguard: {rule} is not a valid rule (field `{field}`)")]
    UnknownRule { field: String, rule: String },

    /// The struct tag identifier cannot be mapped to field names
    #[error("fieldguard: unsupported tag identifier `{0}`")]
    UnsupportedTag(String),

    /// Input could not be turned into request values
    #[error("fieldguard: invalid request data: {0}")]
    InvalidRequest(String),
}

impl ConfigurationError {
    /// Create an unknown rule error
    pub fn unknown_rule(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::UnknownRule {
            field: field.into(),
            rule: rule.into(),
        }
    }
}

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Error message
    pub message: String,

    /// Rule name that failed
    pub constraint: String,

    /// Value that failed validation (optional)
    pub value: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            constraint: "custom".to_string(),
            value: None,
        }
    }

    /// Set the constraint name
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = constraint.into();
        self
    }

    /// Set the invalid value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Failures of one validation call, grouped by field.
///
/// Fields appear in the order they first failed and each field's failures
/// keep the order its rules were declared in. A field without failures is
/// never present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBag {
    fields: IndexMap<String, Vec<ValidationError>>,
}

impl ErrorBag {
    /// Create an empty error bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one failure
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Add an error under its field
    pub fn add(&mut self, error: ValidationError) {
        self.fields
            .entry(error.field.clone())
            .or_default()
            .push(error);
    }

    /// Check whether a field failed
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Messages recorded for a field, in rule order
    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.fields
            .get(field)
            .map(|errors| errors.iter().map(|e| e.message.as_str()).collect())
            .unwrap_or_default()
    }

    /// Structured errors recorded for a field
    pub fn get_field_errors(&self, field: &str) -> &[ValidationError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of failing fields, in first-failure order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Every recorded error, field by field
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.fields.values().flatten()
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "validationError": self })
    }
}

impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, errors) in &self.fields {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in self.errors() {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorBag {}

impl From<Vec<ValidationError>> for ErrorBag {
    fn from(errors: Vec<ValidationError>) -> Self {
        let mut bag = Self::new();
        for error in errors {
            bag.add(error);
        }
        bag
    }
}
