use serde_json::Value;

use crate::mvi::Intent;
use crate::scheduler::AsyncRuleError;
use crate::tree::{FieldPath, Message};

/// Everything that can change a form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// A single field was edited.
    UpdateField { path: FieldPath, value: Value },
    /// Explicit request to validate one field, regardless of policy.
    ValidateField { path: FieldPath },
    /// Partial values deep-merged into the form.
    UpdateAll { values: Value },
    /// Full validation pass before submission.
    ValidateAll,
    /// An async check finished. Only produced by the controller.
    AsyncResolved {
        path: FieldPath,
        result: Result<Vec<Message>, AsyncRuleError>,
    },
}

impl FormAction {
    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FormAction::UpdateField { .. } => "update_field",
            FormAction::ValidateField { .. } => "validate_field",
            FormAction::UpdateAll { .. } => "update_all",
            FormAction::ValidateAll => "validate_all",
            FormAction::AsyncResolved { .. } => "async_resolved",
        }
    }
}

impl Intent for FormAction {}

/// When a requested async check should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckTiming {
    /// After the field has been quiet for the debounce period.
    Debounced,
    /// Right away, cancelling any pending timer for the field.
    Immediate,
}

/// Side effects requested by the update pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CheckAsync {
        path: FieldPath,
        value: Value,
        timing: CheckTiming,
    },
}
