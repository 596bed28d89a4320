use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::form::FormState;

/// Behaviour switches for a form instance.
#[derive(Debug, Clone, Deserialize)]
pub struct FormOptions {
    /// Validate only the changed field (true) or the whole form on each change.
    #[serde(default = "default_validate_single")]
    pub validate_single: bool,
    /// Whether field changes trigger validation.
    #[serde(default)]
    pub validate_on_change: ValidateOnChange,
    /// Quiet period before an async check runs, in milliseconds (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Message shown when an async check itself fails. `{error}` is replaced
    /// with the failure text.
    #[serde(default = "default_async_failure_message")]
    pub async_failure_message: String,
}

fn default_validate_single() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_async_failure_message() -> String {
    "Validation could not be completed: {error}".to_string()
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_single: default_validate_single(),
            validate_on_change: ValidateOnChange::default(),
            debounce_ms: default_debounce_ms(),
            async_failure_message: default_async_failure_message(),
        }
    }
}

impl FormOptions {
    pub fn validate_single(mut self, single: bool) -> Self {
        self.validate_single = single;
        self
    }

    pub fn validate_on_change(mut self, policy: ValidateOnChange) -> Self {
        self.validate_on_change = policy;
        self
    }

    pub fn debounce_ms(mut self, millis: u64) -> Self {
        self.debounce_ms = millis;
        self
    }

    /// Render the synthetic message for a failed async check.
    pub fn async_failure(&self, error: &str) -> String {
        self.async_failure_message.replace("{error}", error)
    }
}

/// When field changes run validation.
///
/// Accepts `true` / `false` or `"always"`, `"never"`, `"after_submit"` in
/// config files; code can supply any predicate over the form state.
#[derive(Clone, Default)]
pub enum ValidateOnChange {
    #[default]
    Always,
    Never,
    /// Only once the form has been through a validate-all pass.
    AfterSubmit,
    When(Arc<dyn Fn(&FormState) -> bool + Send + Sync>),
}

impl ValidateOnChange {
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&FormState) -> bool + Send + Sync + 'static,
    {
        ValidateOnChange::When(Arc::new(predicate))
    }

    /// Evaluate the policy against the state produced by the change.
    pub fn applies(&self, state: &FormState) -> bool {
        match self {
            ValidateOnChange::Always => true,
            ValidateOnChange::Never => false,
            ValidateOnChange::AfterSubmit => state.submitted,
            ValidateOnChange::When(predicate) => predicate(state),
        }
    }
}

impl fmt::Debug for ValidateOnChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateOnChange::Always => f.write_str("Always"),
            ValidateOnChange::Never => f.write_str("Never"),
            ValidateOnChange::AfterSubmit => f.write_str("AfterSubmit"),
            ValidateOnChange::When(_) => f.write_str("When(..)"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPolicy {
    Flag(bool),
    Keyword(PolicyKeyword),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum PolicyKeyword {
    Always,
    Never,
    AfterSubmit,
}

impl<'de> Deserialize<'de> for ValidateOnChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPolicy::deserialize(deserializer)? {
            RawPolicy::Flag(true) | RawPolicy::Keyword(PolicyKeyword::Always) => ValidateOnChange::Always,
            RawPolicy::Flag(false) | RawPolicy::Keyword(PolicyKeyword::Never) => ValidateOnChange::Never,
            RawPolicy::Keyword(PolicyKeyword::AfterSubmit) => ValidateOnChange::AfterSubmit,
        })
    }
}
