use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FormError;
use crate::mvi::Model;
use crate::tree::{init_errors, kind_name, ErrorTree};

/// Complete state of one form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Current field values. Always a JSON object.
    pub values: Value,
    /// Messages from synchronous rules, shaped like `values`.
    pub errors: ErrorTree,
    /// Messages from async rules, shaped like `values`.
    pub async_errors: ErrorTree,
    /// Set once a validate-all pass has run.
    pub submitted: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: Value::Object(Map::new()),
            errors: ErrorTree::default(),
            async_errors: ErrorTree::default(),
            submitted: false,
        }
    }
}

impl FormState {
    /// Fresh state for `initial` with every error slot empty.
    pub fn new(initial: Value) -> Result<Self, FormError> {
        if !initial.is_object() {
            return Err(FormError::NotAnObject {
                found: kind_name(&initial),
            });
        }
        Ok(Self {
            errors: init_errors(&initial),
            async_errors: init_errors(&initial),
            values: initial,
            submitted: false,
        })
    }

    /// Bring both error trees back in line with the shape of `values`.
    pub fn conform_errors(&mut self) {
        self.errors = self.errors.conform(&self.values);
        self.async_errors = self.async_errors.conform(&self.values);
    }
}

impl Model for FormState {}

/// Read-only view handed to form consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSnapshot {
    pub form: Value,
    pub errors: ErrorTree,
    pub async_errors: ErrorTree,
    pub valid: bool,
    pub submitted: bool,
}

impl FormSnapshot {
    pub fn new(state: &FormState, valid: bool) -> Self {
        Self {
            form: state.values.clone(),
            errors: state.errors.clone(),
            async_errors: state.async_errors.clone(),
            valid,
            submitted: state.submitted,
        }
    }
}
