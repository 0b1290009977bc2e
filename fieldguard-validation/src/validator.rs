//! Validation orchestration
//!
//! A [`Validator`] owns the rule set, message overrides and configuration
//! supplied at construction. Each [`Validator::validate`] call:
//!
//! 1. checks that rules and request values were supplied,
//! 2. resolves every declared rule name against the registry,
//! 3. computes the fields exempt from validation for this request,
//! 4. runs every rule of every remaining field, collecting failures.
//!
//! Configuration problems abort the call with a [`ConfigurationError`] and no
//! partial [`ErrorBag`].

use crate::{
    ConfigurationError, ErrorBag, MessageSet, ParsedRule, Request, Result, Rule, RuleRegistry,
    RuleSet, ValidationError,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Default struct tag identifier
pub const DEFAULT_TAG_IDENTIFIER: &str = "json";

/// Tag identifiers whose field names match serde's
const SERDE_TAG_IDENTIFIERS: &[&str] = &["json", "serde"];

/// Validator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Values to validate; `None` until attached
    pub request: Option<Request>,
    /// Rules per field
    pub rules: RuleSet,
    /// Custom messages per field
    pub messages: MessageSet,
    /// Treat every declared field as required
    pub required_default: bool,
    /// Which struct tag names fields in [`Validator::validate_data`]
    pub tag_identifier: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            request: None,
            rules: RuleSet::new(),
            messages: MessageSet::new(),
            required_default: false,
            tag_identifier: DEFAULT_TAG_IDENTIFIER.to_string(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn messages(mut self, messages: MessageSet) -> Self {
        self.messages = messages;
        self
    }

    pub fn required_default(mut self, required: bool) -> Self {
        self.required_default = required;
        self
    }

    pub fn tag_identifier(mut self, tag: impl Into<String>) -> Self {
        self.tag_identifier = tag.into();
        self
    }
}

/// Rule-driven validator for one set of field rules
#[derive(Debug, Clone)]
pub struct Validator {
    opts: Options,
    registry: Arc<RuleRegistry>,
}

impl Validator {
    /// Create a validator backed by the built-in rules
    pub fn new(opts: Options) -> Self {
        Self::with_registry(opts, RuleRegistry::builtin())
    }

    /// Create a validator backed by a custom registry
    pub fn with_registry(opts: Options, registry: Arc<RuleRegistry>) -> Self {
        Self { opts, registry }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Change whether every declared field is required.
    ///
    /// Defaults to `false`. With `true`, absent fields are validated against
    /// all of their rules instead of being skipped.
    pub fn set_default_required(&mut self, required: bool) {
        self.opts.required_default = required;
    }

    /// Validate the attached request values
    pub fn validate(&self) -> Result<ErrorBag> {
        let request = self.opts.request.as_ref().ok_or_else(|| {
            error!("validate called without request values");
            ConfigurationError::MissingRequest
        })?;
        self.run(request)
    }

    /// Validate values supplied per call, ignoring any attached request.
    ///
    /// Lets one long-lived validator serve many requests.
    pub fn validate_request(&self, request: &Request) -> Result<ErrorBag> {
        self.run(request)
    }

    /// Validate a serializable value, using its serde field names.
    ///
    /// Any request attached to the options is ignored.
    pub fn validate_data<T: Serialize + ?Sized>(&self, data: &T) -> Result<ErrorBag> {
        let tag = self.opts.tag_identifier.as_str();
        if !SERDE_TAG_IDENTIFIERS.contains(&tag) {
            error!(tag, "unsupported tag identifier");
            return Err(ConfigurationError::UnsupportedTag(tag.to_string()));
        }
        let request = Request::from_serialize(data)?;
        self.run(&request)
    }

    fn run(&self, request: &Request) -> Result<ErrorBag> {
        if self.opts.rules.is_empty() {
            error!("validate called without rules");
            return Err(ConfigurationError::EmptyRules);
        }
        let checks = self.resolve_checks()?;

        let exempt = self.non_required_fields(request);
        let mut errors = ErrorBag::new();

        for ((field, rules), field_checks) in self.opts.rules.iter().zip(&checks) {
            if exempt.contains(field) {
                continue;
            }
            let value = request.get(field);

            for (spec, (rule, check)) in rules.iter().zip(field_checks) {
                trace!(field, rule = rule.name, kind = value.kind(), "checking rule");
                if let Err(default_message) = check.check(field, value, &rule.params) {
                    let message = self
                        .opts
                        .messages
                        .resolve(field, spec)
                        .map(str::to_string)
                        .unwrap_or(default_message);

                    let mut failure =
                        ValidationError::new(field, message).with_constraint(rule.name);
                    if let Some(raw) = value.to_scalar_string() {
                        failure = failure.with_value(raw);
                    }
                    errors.add(failure);
                }
            }
        }

        debug!(
            fields = self.opts.rules.len(),
            exempt = exempt.len(),
            failed = errors.len(),
            "validation finished"
        );
        Ok(errors)
    }

    /// Parse every declared rule and look up its check, in declaration order.
    ///
    /// Fails fast on the first rule the registry does not know.
    fn resolve_checks(&self) -> Result<Vec<Vec<(ParsedRule<'_>, &dyn Rule)>>> {
        self.opts
            .rules
            .iter()
            .map(|(field, rules)| {
                rules
                    .iter()
                    .map(|spec| {
                        let rule = ParsedRule::parse(spec);
                        match self.registry.get(rule.name) {
                            Some(check) => Ok((rule, check)),
                            None => {
                                error!(field, rule = %spec, "unknown validation rule");
                                Err(ConfigurationError::unknown_rule(field, spec.as_str()))
                            }
                        }
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    /// Fields skipped for this request: absent, not `required`, and
    /// `required_default` off
    fn non_required_fields<'a>(&'a self, request: &Request) -> HashSet<&'a str> {
        if self.opts.required_default {
            return HashSet::new();
        }
        self.opts
            .rules
            .iter()
            .filter(|(field, _)| {
                !request.contains(field) && !self.opts.rules.is_explicitly_required(field)
            })
            .map(|(field, _)| {
                debug!(field, "skipping absent optional field");
                field
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldValue;

    fn rules() -> RuleSet {
        RuleSet::new()
            .field("name", ["required"])
            .field("age", ["between:5,16"])
            .field("email", ["email"])
            .field("zip", ["digits:4"])
    }

    fn request() -> Request {
        Request::new()
            .with("name", "John Doe")
            .with("username", "jhondoe")
            .with("email", "john@mail.com")
            .with("zip", "8233")
    }

    #[test]
    fn test_set_default_required() {
        let mut v = Validator::new(Options::new());
        v.set_default_required(true);
        assert!(v.options().required_default);
    }

    #[test]
    fn test_validate_correct_inputs() {
        let v = Validator::new(Options::new().rules(rules()).request(request()));
        let errors = v.validate().unwrap();
        assert!(errors.is_empty(), "unexpected errors: {}", errors);
    }

    #[test]
    fn test_absent_optional_field_is_exempt() {
        let v = Validator::new(Options::new().rules(rules()).request(request()));
        let exempt = v.non_required_fields(&request());
        assert_eq!(exempt, HashSet::from(["age"]));
    }

    #[test]
    fn test_exemption_needs_bare_required_rule() {
        let v = Validator::new(
            Options::new().rules(
                RuleSet::new()
                    .field("nick", ["alpha", "required"])
                    .field("zip", ["required:strict"])
                    .field("age", ["between:5,16"]),
            ),
        );

        let exempt = v.non_required_fields(&Request::new());
        assert_eq!(exempt, HashSet::from(["zip", "age"]));
    }

    #[test]
    fn test_resolve_checks_keeps_declaration_order() {
        let v = Validator::new(Options::new().rules(rules()));
        let checks = v.resolve_checks().unwrap();

        let names: Vec<Vec<&str>> = checks
            .iter()
            .map(|rules| rules.iter().map(|(rule, _)| rule.name).collect())
            .collect();
        assert_eq!(
            names,
            vec![vec!["required"], vec!["between"], vec!["email"], vec!["digits"]]
        );
        assert!(checks[3][0].1.check("zip", &"8233".into(), &checks[3][0].0.params).is_ok());
    }

    #[test]
    fn test_required_default_validates_absent_fields() {
        let mut v = Validator::new(Options::new().rules(rules()).request(request()));
        v.set_default_required(true);

        let errors = v.validate().unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["age"]);
        assert_eq!(
            errors.messages("age"),
            vec!["The age field must be between 5 and 16"]
        );
    }

    #[test]
    fn test_required_rule_blocks_exemption() {
        let v = Validator::new(
            Options::new()
                .rules(RuleSet::new().field("name", ["required", "alpha"]))
                .request(Request::new()),
        );

        let errors = v.validate().unwrap();
        assert_eq!(
            errors.messages("name"),
            vec!["The name field is required", "The name may only contain letters"]
        );
    }

    #[test]
    fn test_null_is_not_absent() {
        let v = Validator::new(
            Options::new()
                .rules(RuleSet::new().field("option", ["numeric"]))
                .request(Request::new().with("option", FieldValue::Null)),
        );

        assert!(v.validate().unwrap().has("option"));
    }

    #[test]
    fn test_custom_message_overrides_default() {
        let v = Validator::new(
            Options::new()
                .rules(RuleSet::new().field("zip", ["required", "digits:4"]))
                .messages(MessageSet::new().field("zip", ["digits:Zip must be 4 digits"]))
                .request(Request::new().with("zip", "")),
        );

        let errors = v.validate().unwrap();
        assert_eq!(
            errors.messages("zip"),
            vec!["The zip field is required", "Zip must be 4 digits"]
        );
        assert_eq!(errors.get_field_errors("zip")[1].constraint, "digits");
    }

    #[test]
    fn test_empty_rules_is_configuration_error() {
        let v = Validator::new(Options::new().request(request()));
        assert_eq!(v.validate(), Err(ConfigurationError::EmptyRules));
    }

    #[test]
    fn test_missing_request_is_configuration_error() {
        let v = Validator::new(Options::new().rules(rules()));
        assert_eq!(v.validate(), Err(ConfigurationError::MissingRequest));
    }

    #[test]
    fn test_unknown_rule_is_configuration_error() {
        let v = Validator::new(
            Options::new()
                .rules(
                    RuleSet::new()
                        .field("zip", ["len:3"])
                        .field("age", ["betwen:5,16"]),
                )
                .request(Request::new().with("zip", "1")),
        );

        assert_eq!(
            v.validate(),
            Err(ConfigurationError::unknown_rule("age", "betwen:5,16"))
        );
    }

    #[test]
    fn test_unsupported_tag_identifier() {
        #[derive(Serialize)]
        struct Zip {
            zip: String,
        }

        let v = Validator::new(
            Options::new()
                .rules(RuleSet::new().field("zip", ["digits:4"]))
                .tag_identifier("validate"),
        );
        let data = Zip {
            zip: "1234".to_string(),
        };
        assert_eq!(
            v.validate_data(&data),
            Err(ConfigurationError::UnsupportedTag("validate".to_string()))
        );
    }

    #[test]
    fn test_validate_request_ignores_attached_values() {
        let v = Validator::new(
            Options::new()
                .rules(rules())
                .request(request().with("zip", "1")),
        );

        assert!(v.validate().unwrap().has("zip"));
        assert!(v.validate_request(&request()).unwrap().is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let v = Validator::new(
            Options::new()
                .rules(rules())
                .request(request().with("zip", "12").with("age", 40)),
        );

        let first = v.validate().unwrap();
        let second = v.validate().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
