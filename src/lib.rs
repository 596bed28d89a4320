//! Declarative form validation.
//!
//! A form is a JSON object of values plus two error trees of the same shape,
//! one for synchronous rules and one for async checks. Every change goes
//! through a pipeline of pure update steps owned by a single controller task;
//! async checks are debounced per field and their results re-enter the same
//! pipeline.

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod logging;
pub mod mvi;
pub mod rules;
pub mod scheduler;
pub mod tree;

pub use config::{ConfigError, FormOptions, ValidateOnChange};
pub use controller::{FormBuilder, FormController, FormHandle};
pub use error::FormError;
pub use form::{FormAction, FormSnapshot, FormState};
pub use rules::{Rule, RuleSet, Verdict};
pub use scheduler::{AsyncRuleError, AsyncRuleSet};
pub use tree::{init_errors, ErrorTree, FieldPath, Message};
