//! Rule configuration for fieldguard
//!
//! Loads field rules, custom messages and validator flags from JSON or TOML
//! files, lets `FIELDGUARD_*` environment variables override the flags, and
//! checks everything against a rule registry before a validator is built.
//!
//! ```toml
//! required_default = false
//!
//! [rules]
//! name = ["required"]
//! zip = ["digits:4"]
//!
//! [messages]
//! zip = ["digits:Zip must be 4 digits"]
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::{ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::ConfigValidator;

use fieldguard_validation::{
    DEFAULT_TAG_IDENTIFIER, MessageSet, Options, RuleRegistry, RuleSet, Validator,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn default_tag_identifier() -> String {
    DEFAULT_TAG_IDENTIFIER.to_string()
}

/// Declarative validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rules per field
    pub rules: RuleSet,

    /// Custom `rule:message` overrides per field
    #[serde(default)]
    pub messages: MessageSet,

    /// Treat every declared field as required
    #[serde(default)]
    pub required_default: bool,

    /// Struct tag that names fields for typed data
    #[serde(default = "default_tag_identifier")]
    pub tag_identifier: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::new(),
            messages: MessageSet::new(),
            required_default: false,
            tag_identifier: default_tag_identifier(),
        }
    }
}

impl RuleConfig {
    /// Load a rule file, apply `FIELDGUARD_*` overrides and check it against
    /// the built-in rules
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, &EnvLoader::default(), &RuleRegistry::builtin())
    }

    /// Load a rule file with explicit environment and registry
    pub fn load_with(
        path: impl AsRef<Path>,
        env: &EnvLoader,
        registry: &RuleRegistry,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut config = ConfigLoader::auto(path)?.load_file(path)?;
        config.apply_env(env)?;
        ConfigValidator::check(&config, registry)?;

        info!(
            path = %path.display(),
            fields = config.rules.len(),
            required_default = config.required_default,
            "loaded rule configuration"
        );
        Ok(config)
    }

    /// Parse rule configuration from a string
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        ConfigLoader::new(format).parse(content)
    }

    /// Override flags from environment variables
    pub fn apply_env(&mut self, env: &EnvLoader) -> Result<()> {
        if let Some(required) = env.load_bool("REQUIRED_DEFAULT")? {
            self.required_default = required;
        }
        if let Ok(tag) = env.load_var("TAG_IDENTIFIER") {
            self.tag_identifier = tag;
        }
        Ok(())
    }

    /// Validator options without request values
    pub fn options(&self) -> Options {
        Options::new()
            .rules(self.rules.clone())
            .messages(self.messages.clone())
            .required_default(self.required_default)
            .tag_identifier(self.tag_identifier.clone())
    }

    /// Build a validator backed by the built-in rules
    pub fn into_validator(self) -> Validator {
        Validator::new(self.options())
    }

    /// Build a validator backed by a custom registry
    pub fn into_validator_with(self, registry: Arc<RuleRegistry>) -> Validator {
        Validator::with_registry(self.options(), registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldguard_validation::Request;

    fn config() -> RuleConfig {
        RuleConfig::parse(
            r#"{
                "rules": {"name": ["required"], "zip": ["digits:4"]},
                "messages": {"zip": ["digits:Zip must be 4 digits"]}
            }"#,
            FileFormat::Json,
        )
        .unwrap()
    }

    #[test]
    fn test_options_carry_configuration() {
        let options = config().options();
        assert_eq!(options.rules.len(), 2);
        assert!(!options.required_default);
        assert_eq!(options.tag_identifier, "json");
        assert!(options.request.is_none());
    }

    #[test]
    fn test_into_validator() {
        let validator = config().into_validator();
        let request = Request::new().with("name", "John").with("zip", "12");

        let errors = validator.validate_request(&request).unwrap();
        assert_eq!(errors.messages("zip"), vec!["Zip must be 4 digits"]);
    }

    #[test]
    fn test_default_config_has_json_tag() {
        let config = RuleConfig::default();
        assert_eq!(config.tag_identifier, DEFAULT_TAG_IDENTIFIER);
        assert!(config.rules.is_empty());
    }
}
