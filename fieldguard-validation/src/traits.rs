// Validation traits

use crate::{ErrorBag, FieldValue, MessageSet, Options, Params, Result, RuleSet, Validator};
use serde::Serialize;

/// A named check that the registry dispatches rule specifications to.
///
/// `Err` carries the default failure message. Custom overrides replace it
/// after the fact, so checks never look at message sets.
pub trait Rule: Send + Sync {
    fn check(&self, field: &str, value: &FieldValue, params: &Params<'_>)
        -> std::result::Result<(), String>;
}

impl<F> Rule for F
where
    F: Fn(&str, &FieldValue, &Params<'_>) -> std::result::Result<(), String> + Send + Sync,
{
    fn check(
        &self,
        field: &str,
        value: &FieldValue,
        params: &Params<'_>,
    ) -> std::result::Result<(), String> {
        self(field, value, params)
    }
}

/// Types that declare their own field rules.
///
/// Field names are the serde names of the serialized value.
pub trait Validate: Serialize {
    /// Rules for this type's fields
    fn rules() -> RuleSet;

    /// Custom messages, none by default
    fn messages() -> MessageSet {
        MessageSet::new()
    }

    /// Validate `self` against [`Validate::rules`]
    fn validate(&self) -> Result<ErrorBag> {
        let options = Options::new()
            .rules(Self::rules())
            .messages(Self::messages());
        Validator::new(options).validate_data(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Signup {
        email: String,
        zip: String,
    }

    impl Validate for Signup {
        fn rules() -> RuleSet {
            RuleSet::new()
                .field("email", ["required", "email"])
                .field("zip", ["digits:4"])
        }

        fn messages() -> MessageSet {
            MessageSet::new().field("zip", ["digits:Zip must be 4 digits"])
        }
    }

    #[test]
    fn test_closure_is_a_rule() {
        let even = |field: &str, value: &FieldValue, _: &Params| match value.as_f64() {
            Some(n) if n % 2.0 == 0.0 => Ok(()),
            _ => Err(format!("The {} field must be even", field)),
        };

        assert!(even.check("n", &FieldValue::from(4), &Params::none()).is_ok());
        assert!(even.check("n", &FieldValue::from(3), &Params::none()).is_err());
    }

    #[test]
    fn test_validate_trait() {
        let ok = Signup {
            email: "john@mail.com".to_string(),
            zip: "8233".to_string(),
        };
        assert!(ok.validate().unwrap().is_empty());

        let bad = Signup {
            email: "john@mail.com".to_string(),
            zip: "82a".to_string(),
        };
        let errors = bad.validate().unwrap();
        assert_eq!(errors.messages("zip"), vec!["Zip must be 4 digits"]);
    }
}
