// Rule configuration validation

use crate::{ConfigError, Result, RuleConfig};
use fieldguard_validation::{ConfigurationError, ParsedRule, RuleRegistry};
use tracing::warn;

/// Load-time checks for rule configuration.
///
/// Catches the mistakes a validator would otherwise only report on its first
/// call.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run every check against a registry
    pub fn check(config: &RuleConfig, registry: &RuleRegistry) -> Result<()> {
        Self::not_empty(config)?;
        Self::known_rules(config, registry)?;
        Self::message_overrides(config);
        Ok(())
    }

    /// At least one field must carry rules
    pub fn not_empty(config: &RuleConfig) -> Result<()> {
        if config.rules.is_empty() {
            return Err(ConfigError::Rules(ConfigurationError::EmptyRules));
        }
        Ok(())
    }

    /// Every rule name must be registered
    pub fn known_rules(config: &RuleConfig, registry: &RuleRegistry) -> Result<()> {
        for (field, rules) in config.rules.iter() {
            for spec in rules {
                let rule = ParsedRule::parse(spec);
                if !registry.contains(rule.name) {
                    return Err(ConfigurationError::unknown_rule(field, spec.as_str()).into());
                }
            }
        }
        Ok(())
    }

    /// Overrides that can never apply are logged, not rejected
    pub fn message_overrides(config: &RuleConfig) {
        for (field, overrides) in config.messages.iter() {
            if config.rules.get(field).is_none() {
                warn!(field, "custom messages for a field without rules");
            }
            for text in overrides {
                if !text.contains(':') {
                    warn!(field, message = %text, "custom message is not of the form `rule:text`");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldguard_validation::{MessageSet, RuleSet};

    fn config(rules: RuleSet) -> RuleConfig {
        RuleConfig {
            rules,
            ..RuleConfig::default()
        }
    }

    #[test]
    fn test_empty_rules_rejected() {
        let registry = RuleRegistry::new();
        let result = ConfigValidator::check(&config(RuleSet::new()), &registry);
        assert!(matches!(
            result,
            Err(ConfigError::Rules(ConfigurationError::EmptyRules))
        ));
    }

    #[test]
    fn test_unknown_rule_rejected() {
        let registry = RuleRegistry::new();
        let rules = RuleSet::new().field("zip", ["digits:4", "postcode"]);

        let err = ConfigValidator::check(&config(rules), &registry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Rule configuration rejected: fieldguard: postcode is not a valid rule (field `zip`)"
        );
    }

    #[test]
    fn test_stray_messages_only_warn() {
        let registry = RuleRegistry::new();
        let mut cfg = config(RuleSet::new().field("zip", ["digits:4"]));
        cfg.messages = MessageSet::new().field("email", ["no colon here"]);

        assert!(ConfigValidator::check(&cfg, &registry).is_ok());
    }
}
