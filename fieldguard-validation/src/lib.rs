//! Rule-string driven field validation
//!
//! Fields carry rule specifications such as `"required"`, `"between:5,16"` or
//! `"digits:4"`. A [`Validator`] checks request values against them and
//! returns an [`ErrorBag`] of human readable messages per failing field.
//!
//! # Examples
//!
//! ## Basic Validation
//!
//! ```
//! use fieldguard_validation::{Options, Request, RuleSet, Validator};
//!
//! let rules = RuleSet::new()
//!     .field("name", ["required"])
//!     .field("age", ["between:5,16"])
//!     .field("zip", ["digits:4"]);
//!
//! let request = Request::new().with("name", "John Doe").with("zip", "8233");
//!
//! // `age` is absent and not required, so it is skipped
//! let errors = Validator::new(Options::new().rules(rules).request(request))
//!     .validate()
//!     .unwrap();
//! assert!(errors.is_empty());
//! ```
//!
//! ## Custom Messages
//!
//! ```
//! use fieldguard_validation::{MessageSet, Options, Request, RuleSet, Validator};
//!
//! let options = Options::new()
//!     .rules(RuleSet::new().field("zip", ["digits:4"]))
//!     .messages(MessageSet::new().field("zip", ["digits:Zip must be 4 digits"]))
//!     .request(Request::new().with("zip", "12"));
//!
//! let errors = Validator::new(options).validate().unwrap();
//! assert_eq!(errors.messages("zip"), vec!["Zip must be 4 digits"]);
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use fieldguard_validation::{Options, Request, RuleRegistry, RuleSet, Validator};
//! use std::sync::Arc;
//!
//! let mut registry = RuleRegistry::new();
//! registry.register_fn("even", |field, value, _| match value.as_f64() {
//!     Some(n) if n % 2.0 == 0.0 => Ok(()),
//!     _ => Err(format!("The {} field must be even", field)),
//! });
//!
//! let options = Options::new()
//!     .rules(RuleSet::new().field("count", ["required", "even"]))
//!     .request(Request::new().with("count", 3));
//!
//! let errors = Validator::with_registry(options, Arc::new(registry))
//!     .validate()
//!     .unwrap();
//! assert_eq!(errors.messages("count"), vec!["The count field must be even"]);
//! ```

mod errors;
mod messages;
mod registry;
mod rules;
mod traits;
mod validator;
mod validators;
mod value;

pub use errors::*;
pub use messages::*;
pub use registry::*;
pub use rules::*;
pub use traits::*;
pub use validator::*;
pub use value::*;
