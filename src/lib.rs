// fieldguard - declarative field validation for request payloads
//
// Rules are plain strings attached to field names; this crate bundles the
// validation engine with optional file and environment configuration.

// Re-export the validation engine
pub use fieldguard_validation::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use fieldguard_config;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConfigurationError, ErrorBag, FieldValue, MessageSet, Options, Request, RuleRegistry,
        RuleSet, Validate, Validator,
    };

    #[cfg(feature = "config")]
    pub use fieldguard_config::{ConfigError, RuleConfig};
}
