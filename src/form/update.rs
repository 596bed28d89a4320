//! The standard update steps.
//!
//! ```text
//! action ──→ UpdateFormValues ──→ UpdateSyncErrors ──→ UpdateAsyncErrors ──→ (state, effects)
//! ```
//!
//! Each step sees the state produced by the previous one, so the sync and
//! async steps always work on the updated values.

use serde_json::Value;

use crate::error::FormError;
use crate::mvi::Transition;
use crate::rules::{errors_from_verdicts, validate, validate_field};
use crate::tree::{
    is_leaf, kind_name, leaf_paths, merge_values, owning_field, set_value_at, value_at, ErrorTree, FieldPath,
};

use super::intent::{CheckTiming, Effect, FormAction};
use super::reducer::{FormContext, UpdateFn};
use super::state::FormState;

type StepResult = Result<Transition<FormState, Effect>, FormError>;

/// The default pipeline: values, then sync errors, then async errors.
pub fn standard_steps() -> Vec<Box<dyn UpdateFn>> {
    vec![
        Box::new(UpdateFormValues),
        Box::new(UpdateSyncErrors),
        Box::new(UpdateAsyncErrors),
    ]
}

/// Writes edited values into the form.
#[derive(Debug, Clone, Copy)]
pub struct UpdateFormValues;

impl UpdateFn for UpdateFormValues {
    fn name(&self) -> &'static str {
        "update_form_values"
    }

    fn apply(&self, mut state: FormState, action: &FormAction, _context: &FormContext) -> StepResult {
        match action {
            FormAction::UpdateField { path, value } => {
                let field = owning_field(&state.values, path);
                let reshaped = !is_leaf(&state.values, &field) || (field == *path && value.is_object());
                set_value_at(&mut state.values, path, value.clone())?;
                if reshaped {
                    state.conform_errors();
                }
            }
            FormAction::UpdateAll { values } => {
                if !values.is_object() {
                    return Err(FormError::NotAnObject {
                        found: kind_name(values),
                    });
                }
                merge_values(&mut state.values, values.clone());
                state.conform_errors();
            }
            FormAction::ValidateField { .. }
            | FormAction::ValidateAll
            | FormAction::AsyncResolved { .. } => {}
        }
        Ok(Transition::new(state))
    }
}

/// Runs the synchronous rules.
#[derive(Debug, Clone, Copy)]
pub struct UpdateSyncErrors;

impl UpdateFn for UpdateSyncErrors {
    fn name(&self) -> &'static str {
        "update_sync_errors"
    }

    fn apply(&self, mut state: FormState, action: &FormAction, context: &FormContext) -> StepResult {
        match action {
            FormAction::UpdateField { path, .. } => {
                if context.options.validate_on_change.applies(&state) {
                    if context.options.validate_single {
                        let field = owning_field(&state.values, path);
                        for leaf in leaves_under(&state.values, &field) {
                            revalidate_field(&mut state, context, &leaf)?;
                        }
                    } else {
                        revalidate_all(&mut state, context);
                    }
                }
            }
            FormAction::ValidateField { path } => {
                let field = owning_field(&state.values, path);
                revalidate_field(&mut state, context, &field)?;
            }
            FormAction::UpdateAll { .. } => {
                if context.options.validate_on_change.applies(&state) {
                    revalidate_all(&mut state, context);
                }
            }
            FormAction::ValidateAll => {
                state.submitted = true;
                revalidate_all(&mut state, context);
            }
            FormAction::AsyncResolved { .. } => {}
        }
        Ok(Transition::new(state))
    }
}

/// Clears stale async results, requests fresh checks and stores results.
#[derive(Debug, Clone, Copy)]
pub struct UpdateAsyncErrors;

impl UpdateFn for UpdateAsyncErrors {
    fn name(&self) -> &'static str {
        "update_async_errors"
    }

    fn apply(&self, mut state: FormState, action: &FormAction, context: &FormContext) -> StepResult {
        let targets: Vec<(FieldPath, CheckTiming)> = match action {
            FormAction::UpdateField { path, .. } => {
                if context.options.validate_on_change.applies(&state) {
                    let field = owning_field(&state.values, path);
                    declared_leaves(&state, context, move |declared| declared.starts_with(&field))
                        .map(|declared| (declared, CheckTiming::Debounced))
                        .collect()
                } else {
                    Vec::new()
                }
            }
            FormAction::ValidateField { path } => {
                let field = owning_field(&state.values, path);
                declared_leaves(&state, context, move |declared| *declared == field)
                    .map(|declared| (declared, CheckTiming::Immediate))
                    .collect()
            }
            FormAction::UpdateAll { values } => {
                if context.options.validate_on_change.applies(&state) {
                    declared_leaves(&state, context, |declared| value_at(values, declared).is_some())
                        .map(|declared| (declared, CheckTiming::Debounced))
                        .collect()
                } else {
                    Vec::new()
                }
            }
            FormAction::ValidateAll => declared_leaves(&state, context, |_| true)
                .map(|declared| (declared, CheckTiming::Immediate))
                .collect(),
            FormAction::AsyncResolved { path, result } => {
                if is_leaf(&state.values, path) {
                    let messages = match result {
                        Ok(messages) => messages.clone(),
                        Err(err) => vec![context.options.async_failure(&err.message)],
                    };
                    state.async_errors.merge(ErrorTree::at_path(path, messages));
                } else {
                    tracing::debug!(path = %path, "Dropping async result for a field that no longer exists");
                }
                Vec::new()
            }
        };

        let mut effects = Vec::with_capacity(targets.len());
        for (path, timing) in targets {
            state.async_errors.set(&path, Vec::new());
            let value = value_at(&state.values, &path).cloned().unwrap_or(Value::Null);
            effects.push(Effect::CheckAsync { path, value, timing });
        }
        Ok(Transition::with_effects(state, effects))
    }
}

/// Leaf paths at or below `path`.
fn leaves_under(values: &Value, path: &FieldPath) -> Vec<FieldPath> {
    if is_leaf(values, path) {
        return vec![path.clone()];
    }
    leaf_paths(values)
        .into_iter()
        .filter(|leaf| leaf.starts_with(path))
        .collect()
}

/// Fields with an async rule that are leaves of the current values and
/// match `select`.
fn declared_leaves<'a>(
    state: &'a FormState,
    context: &'a FormContext,
    select: impl Fn(&FieldPath) -> bool + 'a,
) -> impl Iterator<Item = FieldPath> + 'a {
    context
        .async_rules
        .paths()
        .filter(move |declared| is_leaf(&state.values, declared) && select(*declared))
        .cloned()
}

fn revalidate_field(state: &mut FormState, context: &FormContext, path: &FieldPath) -> Result<(), FormError> {
    let verdict = validate_field(&context.rules, &state.values, path)?;
    state.errors.set(path, verdict.into_messages());
    Ok(())
}

fn revalidate_all(state: &mut FormState, context: &FormContext) {
    let verdicts = validate(&context.rules, &state.values);
    state.errors = errors_from_verdicts(&state.values, verdicts);
}
