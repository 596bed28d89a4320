use std::fmt;

use crate::config::FormOptions;
use crate::error::FormError;
use crate::mvi::{Reducer, Transition};
use crate::rules::{form_is_valid, RuleSet};
use crate::scheduler::AsyncRuleSet;

use super::intent::{Effect, FormAction};
use super::state::{FormSnapshot, FormState};
use super::update::standard_steps;

/// Read-only inputs shared by every update step.
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    pub rules: RuleSet,
    pub async_rules: AsyncRuleSet,
    pub options: FormOptions,
}

/// One step of the update pipeline.
///
/// Steps must be pure: no I/O, no timers, nothing that would make the same
/// `(state, action)` produce a different result.
pub trait UpdateFn: Send + Sync {
    /// Name used in trace logs.
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        state: FormState,
        action: &FormAction,
        context: &FormContext,
    ) -> Result<Transition<FormState, Effect>, FormError>;
}

/// Step backed by a closure, see [`update_fn`].
pub struct FnStep<F> {
    name: &'static str,
    apply: F,
}

/// Wrap a closure as a pipeline step.
pub fn update_fn<F>(name: &'static str, apply: F) -> FnStep<F>
where
    F: Fn(FormState, &FormAction, &FormContext) -> Result<Transition<FormState, Effect>, FormError>
        + Send
        + Sync,
{
    FnStep { name, apply }
}

impl<F> UpdateFn for FnStep<F>
where
    F: Fn(FormState, &FormAction, &FormContext) -> Result<Transition<FormState, Effect>, FormError>
        + Send
        + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(
        &self,
        state: FormState,
        action: &FormAction,
        context: &FormContext,
    ) -> Result<Transition<FormState, Effect>, FormError> {
        (self.apply)(state, action, context)
    }
}

/// Folds the configured steps over the state, in order.
pub struct FormReducer {
    steps: Vec<Box<dyn UpdateFn>>,
    context: FormContext,
}

impl FormReducer {
    /// Reducer running the standard value, sync and async steps.
    pub fn new(context: FormContext) -> Self {
        Self {
            steps: standard_steps(),
            context,
        }
    }

    /// Append a step after the existing ones.
    pub fn with_step(mut self, step: impl UpdateFn + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Replace the whole pipeline.
    pub fn with_steps(mut self, steps: Vec<Box<dyn UpdateFn>>) -> Self {
        self.steps = steps;
        self
    }

    pub fn context(&self) -> &FormContext {
        &self.context
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn is_valid(&self, state: &FormState) -> bool {
        form_is_valid(&self.context.rules, state)
    }

    pub fn snapshot(&self, state: &FormState) -> FormSnapshot {
        FormSnapshot::new(state, self.is_valid(state))
    }
}

impl fmt::Debug for FormReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormReducer")
            .field("steps", &self.step_names())
            .field("context", &self.context)
            .finish()
    }
}

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormAction;
    type Effect = Effect;
    type Error = FormError;

    fn reduce(
        &self,
        state: FormState,
        action: &FormAction,
    ) -> Result<Transition<FormState, Effect>, FormError> {
        self.steps
            .iter()
            .try_fold(Transition::new(state), |mut acc, step| {
                let next = step.apply(acc.state, action, &self.context)?;
                if !next.effects.is_empty() {
                    tracing::trace!(
                        step = step.name(),
                        effects = next.effects.len(),
                        "Update step requested effects"
                    );
                }
                acc.effects.extend(next.effects);
                Ok(Transition::with_effects(next.state, acc.effects))
            })
    }
}
