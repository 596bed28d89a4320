//! Whole-form validation: rule-set resolution and verdict aggregation.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::FormError;
use crate::form::FormState;
use crate::tree::{init_errors, is_leaf, leaf_paths, value_at, ErrorTree, FieldPath};

use super::evaluator::{evaluate, Verdict};
use super::rule::{Rule, RuleSet};

/// Rules that apply to `values`: an empty list for every leaf, overridden by
/// declared rules whose path is a leaf. Rules for absent fields are dropped.
pub fn effective_rules<'a>(rule_set: &'a RuleSet, values: &Value) -> BTreeMap<FieldPath, &'a [Rule]> {
    leaf_paths(values)
        .into_iter()
        .map(|path| {
            let rules = rule_set.rules_for(&path);
            (path, rules)
        })
        .collect()
}

/// One verdict per leaf field of `values`, `Valid` ones included.
pub fn validate(rule_set: &RuleSet, values: &Value) -> BTreeMap<FieldPath, Verdict> {
    effective_rules(rule_set, values)
        .into_iter()
        .map(|(path, rules)| {
            let verdict = match value_at(values, &path) {
                Some(value) => evaluate(value, values, rules),
                None => Verdict::Valid,
            };
            (path, verdict)
        })
        .collect()
}

/// Verdict for a single field.
pub fn validate_field(rule_set: &RuleSet, values: &Value, path: &FieldPath) -> Result<Verdict, FormError> {
    if !is_leaf(values, path) {
        return Err(FormError::UnknownField { path: path.clone() });
    }
    let value = value_at(values, path).ok_or_else(|| FormError::UnknownField { path: path.clone() })?;
    Ok(evaluate(value, values, rule_set.rules_for(path)))
}

/// Error tree shaped like `values` holding each verdict's messages.
pub fn errors_from_verdicts(values: &Value, verdicts: BTreeMap<FieldPath, Verdict>) -> ErrorTree {
    let mut errors = init_errors(values);
    for (path, verdict) in verdicts {
        errors.set(&path, verdict.into_messages());
    }
    errors
}

pub fn all_valid(verdicts: &BTreeMap<FieldPath, Verdict>) -> bool {
    verdicts.values().all(Verdict::is_valid)
}

/// Overall validity: no stored sync or async messages, and a fresh pass of
/// the rule set over the current values finds nothing either.
pub fn form_is_valid(rule_set: &RuleSet, state: &FormState) -> bool {
    state.errors.is_clear()
        && state.async_errors.is_clear()
        && all_valid(&validate(rule_set, &state.values))
}
