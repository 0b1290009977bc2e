// Custom message overrides

use crate::rules::rule_name;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name to ordered `rule:message` overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageSet {
    fields: IndexMap<String, Vec<String>>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration of a field's overrides
    pub fn field<I, S>(mut self, field: impl Into<String>, overrides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(field, overrides);
        self
    }

    pub fn insert<I, S>(&mut self, field: impl Into<String>, overrides: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(field.into(), overrides.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Custom message for a field and rule specification.
    ///
    /// Parameters are ignored on both sides, so `between:3,5` matches an
    /// override written as `between:...`. The first matching override wins.
    pub fn resolve(&self, field: &str, rule: &str) -> Option<&str> {
        let name = rule_name(rule);
        self.get(field)?.iter().find_map(|m| {
            let (prefix, text) = m.split_once(':')?;
            (prefix == name).then_some(text)
        })
    }
}

impl<K, I, S> FromIterator<(K, I)> for MessageSet
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut set = MessageSet::new();
        for (field, overrides) in iter {
            set.insert(field, overrides);
        }
        set
    }
}
