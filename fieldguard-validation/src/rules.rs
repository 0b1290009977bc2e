// Rule sets and rule specification parsing

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the rule that opts a field out of exemption
pub const REQUIRED: &str = "required";

/// Parameters of a parsed rule.
///
/// Values stay unparsed strings; each check converts what it needs and fails
/// closed when it cannot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params<'a> {
    raw: Option<&'a str>,
    list: Vec<&'a str>,
}

impl<'a> Params<'a> {
    /// Split a raw parameter string on commas
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw: Some(raw),
            list: raw.split(',').collect(),
        }
    }

    /// No parameters at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything after the first `:`, commas included
    pub fn raw(&self) -> Option<&'a str> {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.list.get(index).copied()
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.list
    }

    /// Parse one parameter, `None` when it is absent or malformed
    pub fn parse_at<T: FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|p| p.trim().parse().ok())
    }

    /// Parse the first two parameters as an inclusive range
    pub fn range<T: FromStr + PartialOrd>(&self) -> Option<(T, T)> {
        let min = self.parse_at(0)?;
        let max = self.parse_at(1)?;
        (min <= max).then_some((min, max))
    }
}

/// A rule specification split into name and parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule<'a> {
    pub name: &'a str,
    pub params: Params<'a>,
}

impl<'a> ParsedRule<'a> {
    /// Split `name` or `name:p1,p2` on the first `:` only
    pub fn parse(spec: &'a str) -> Self {
        match spec.split_once(':') {
            Some((name, raw)) => Self {
                name,
                params: Params::parse(raw),
            },
            None => Self {
                name: spec,
                params: Params::none(),
            },
        }
    }
}

/// Bare rule name of a specification, parameters stripped
pub fn rule_name(spec: &str) -> &str {
    spec.split_once(':').map_or(spec, |(name, _)| name)
}

/// Field name to ordered rule specifications.
///
/// Fields are validated in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    fields: IndexMap<String, Vec<String>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration of a field's rules
    pub fn field<I, S>(mut self, field: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(field, rules);
        self
    }

    /// Declare (or replace) a field's rules
    pub fn insert<I, S>(&mut self, field: impl Into<String>, rules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .insert(field.into(), rules.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Whether a field carries the bare `required` rule
    pub fn is_explicitly_required(&self, field: &str) -> bool {
        self.get(field)
            .is_some_and(|rules| rules.iter().any(|r| r == REQUIRED))
    }
}

impl<K, I, S> FromIterator<(K, I)> for RuleSet
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut set = RuleSet::new();
        for (field, rules) in iter {
            set.insert(field, rules);
        }
        set
    }
}
