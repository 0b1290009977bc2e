//! Integration tests for common fieldguard workflows.
//!
//! These tests verify that the most common use cases work correctly.

use fieldguard::prelude::*;
use serde::Serialize;

// =============================================================================
// Form / Query Validation
// =============================================================================

#[test]
fn test_form_validation_with_optional_fields() {
    let rules = RuleSet::new()
        .field("username", ["required", "alpha_dash", "between:3,16"])
        .field("email", ["required", "email"])
        .field("website", ["url"])
        .field("age", ["numeric_between:13,120"]);

    let validator = Validator::new(Options::new().rules(rules));

    // Optional fields may be left out entirely
    let request = Request::from_pairs([("username", "jane_doe"), ("email", "jane@example.com")]);
    assert!(validator.validate_request(&request).unwrap().is_empty());

    // ...but are checked once supplied
    let request = Request::from_pairs([
        ("username", "jane_doe"),
        ("email", "jane@example.com"),
        ("website", "not a url"),
        ("age", "9"),
    ]);
    let errors = validator.validate_request(&request).unwrap();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["website", "age"]);
}

#[test]
fn test_required_default_toggle() {
    let rules = RuleSet::new()
        .field("name", ["required"])
        .field("age", ["between:5,16"]);
    let request = Request::new().with("name", "John Doe");

    let mut validator = Validator::new(Options::new().rules(rules).request(request));
    assert!(validator.validate().unwrap().is_empty());

    validator.set_default_required(true);
    let errors = validator.validate().unwrap();
    assert_eq!(errors.messages("age"), vec!["The age field must be between 5 and 16"]);
}

// =============================================================================
// JSON Payloads
// =============================================================================

#[test]
fn test_json_body_with_custom_messages() {
    let body = br#"{"name": "", "zip": "12", "tags": ["a", "b", "c"]}"#;

    let options = Options::new()
        .rules(
            RuleSet::new()
                .field("name", ["required"])
                .field("zip", ["digits:4"])
                .field("tags", ["max:2"]),
        )
        .messages(
            MessageSet::new()
                .field("name", ["required:Please tell us your name"])
                .field("zip", ["len:unused", "digits:Zip must be 4 digits"]),
        )
        .request(Request::from_json_slice(body).unwrap());

    let errors = Validator::new(options).validate().unwrap();
    assert_eq!(
        errors.to_json(),
        serde_json::json!({
            "validationError": {
                "name": ["Please tell us your name"],
                "zip": ["Zip must be 4 digits"],
                "tags": ["The tags field must be maximum 2"]
            }
        })
    );
}

#[test]
fn test_malformed_body_is_rejected_before_validation() {
    assert!(matches!(
        Request::from_json_slice(b"[1, 2]"),
        Err(ConfigurationError::InvalidRequest(_))
    ));
}

// =============================================================================
// Typed Data
// =============================================================================

#[derive(Serialize)]
struct CreateUser {
    name: String,
    email: String,
    #[serde(rename = "zip_code")]
    zip: Option<String>,
}

impl Validate for CreateUser {
    fn rules() -> RuleSet {
        RuleSet::new()
            .field("name", ["required", "alpha_space"])
            .field("email", ["required", "email"])
            .field("zip_code", ["required", "digits:5"])
    }
}

#[test]
fn test_validate_trait_on_dto() {
    let user = CreateUser {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        zip: Some("94107".to_string()),
    };
    assert!(user.validate().unwrap().is_empty());

    let user = CreateUser {
        name: "Jane Doe".to_string(),
        email: "jane".to_string(),
        zip: None,
    };
    let errors = user.validate().unwrap();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "zip_code"]);
    assert_eq!(errors.messages("zip_code").len(), 2);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_rule_config_round_trip_into_validator() {
    use fieldguard::fieldguard_config::FileFormat;

    let config = RuleConfig::parse(
        r#"
            [rules]
            email = ["required", "email"]

            [messages]
            email = ["email:That does not look like an email"]
        "#,
        FileFormat::Toml,
    )
    .unwrap();

    let validator = config.into_validator();
    let errors = validator
        .validate_request(&Request::new().with("email", "nope"))
        .unwrap();
    assert_eq!(
        errors.messages("email"),
        vec!["That does not look like an email"]
    );
}
