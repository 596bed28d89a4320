//! Rule definitions and their evaluation.
//!
//! ```text
//! RuleSet ──→ effective_rules(values) ──→ evaluate per field ──→ Verdicts
//! ```

pub mod builtin;
mod evaluator;
mod orchestrator;
mod rule;

pub use evaluator::{evaluate, Verdict};
pub use orchestrator::{
    all_valid, effective_rules, errors_from_verdicts, form_is_valid, validate, validate_field,
};
pub use rule::{Predicate, Rule, RuleMessage, RuleSet};
