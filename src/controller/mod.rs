//! Form controller: owns the state, serialises all updates.
//!
//! ```text
//! FormHandle ──(ControllerMessage)──→ FormController ──→ FormReducer
//!      ↑                                 │      ↑
//!   latest()  ←── published snapshot ────┘      │
//!                               AsyncScheduler ─┘ (SchedulerEvent)
//! ```

mod handle;
mod runner;
mod types;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::FormOptions;
use crate::error::FormError;
use crate::form::{standard_steps, FormContext, FormReducer, FormState, UpdateFn};
use crate::rules::RuleSet;
use crate::scheduler::{AsyncRuleSet, AsyncScheduler};

pub use handle::FormHandle;
pub use runner::FormController;
pub use types::{ControllerMessage, SubmitCallback};

/// Assembles a form from initial values, rules and options.
pub struct FormBuilder {
    initial: Value,
    rules: RuleSet,
    async_rules: AsyncRuleSet,
    options: FormOptions,
    steps: Option<Vec<Box<dyn UpdateFn>>>,
    extra_steps: Vec<Box<dyn UpdateFn>>,
}

impl FormBuilder {
    pub fn new(initial: Value) -> Self {
        Self {
            initial,
            rules: RuleSet::new(),
            async_rules: AsyncRuleSet::new(),
            options: FormOptions::default(),
            steps: None,
            extra_steps: Vec::new(),
        }
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn async_rules(mut self, async_rules: AsyncRuleSet) -> Self {
        self.async_rules = async_rules;
        self
    }

    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Append a step after the pipeline.
    pub fn step(mut self, step: impl UpdateFn + 'static) -> Self {
        self.extra_steps.push(Box::new(step));
        self
    }

    /// Replace the standard pipeline. Steps added with [`step`](Self::step)
    /// still run after these.
    pub fn steps(mut self, steps: Vec<Box<dyn UpdateFn>>) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Validate the inputs and wire up the controller.
    ///
    /// Nothing runs until [`FormController::run`] is polled.
    pub fn build(self) -> Result<(FormHandle, FormController), FormError> {
        self.options.validate()?;
        let state = FormState::new(self.initial)?;

        let mut steps = self.steps.unwrap_or_else(standard_steps);
        steps.extend(self.extra_steps);

        let quiet_period = Duration::from_millis(self.options.debounce_ms);
        let reducer = FormReducer::new(FormContext {
            rules: self.rules,
            async_rules: self.async_rules.clone(),
            options: self.options,
        })
        .with_steps(steps);

        let (sender, inbox) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();
        let scheduler = AsyncScheduler::new(self.async_rules, quiet_period, events_tx);
        let published = Arc::new(RwLock::new(reducer.snapshot(&state)));

        let handle = FormHandle::new(sender, Arc::clone(&published));
        let controller = FormController::new(reducer, state, scheduler, inbox, events, published);
        Ok((handle, controller))
    }

    /// Build and run the controller on the current tokio runtime.
    pub fn spawn(self) -> Result<(FormHandle, JoinHandle<Result<FormState, FormError>>), FormError> {
        let (handle, controller) = self.build()?;
        Ok((handle, tokio::spawn(controller.run())))
    }
}
