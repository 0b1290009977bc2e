//! Rule registry - rule names to checks

use crate::validators;
use crate::{FieldValue, Params, Rule};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

static BUILTIN: Lazy<Arc<RuleRegistry>> = Lazy::new(|| Arc::new(RuleRegistry::new()));

/// Registry of named checks.
///
/// Populated during setup and shared read-only afterwards, usually behind an
/// `Arc`.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Create a registry holding every built-in rule
    pub fn new() -> Self {
        let mut registry = Self::empty();
        validators::register_builtin(&mut registry);
        debug!(count = registry.len(), "registered built-in rules");
        registry
    }

    /// Create a registry with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Shared registry of built-in rules
    pub fn builtin() -> Arc<RuleRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Register a check, replacing any previous rule of the same name
    pub fn register(&mut self, name: impl Into<String>, rule: impl Rule + 'static) -> &mut Self {
        let name = name.into();
        debug!(rule = %name, "registering rule");
        self.rules.insert(name, Arc::new(rule));
        self
    }

    /// Register a closure check
    pub fn register_fn<F>(&mut self, name: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&str, &FieldValue, &Params<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.register(name, check)
    }

    /// Get a rule by name
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.get(name).map(|rule| rule.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
