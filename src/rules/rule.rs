//! Rule and rule-set definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::tree::{FieldPath, Message};

/// Predicate over a field's value and the complete values tree.
pub type Predicate = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Failure message of a rule: fixed text or computed from the value.
#[derive(Clone)]
pub enum RuleMessage {
    Text(Message),
    Computed(Arc<dyn Fn(&Value) -> Message + Send + Sync>),
}

impl RuleMessage {
    pub fn resolve(&self, value: &Value) -> Message {
        match self {
            RuleMessage::Text(text) => text.clone(),
            RuleMessage::Computed(build) => build(value),
        }
    }
}

impl fmt::Debug for RuleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleMessage::Text(text) => f.debug_tuple("Text").field(text).finish(),
            RuleMessage::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for RuleMessage {
    fn from(text: &str) -> Self {
        RuleMessage::Text(text.to_string())
    }
}

impl From<String> for RuleMessage {
    fn from(text: String) -> Self {
        RuleMessage::Text(text)
    }
}

/// One validation check: satisfied when the predicate returns `true`.
#[derive(Clone)]
pub struct Rule {
    predicate: Predicate,
    message: RuleMessage,
}

impl Rule {
    pub fn new<P>(predicate: P, message: impl Into<RuleMessage>) -> Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    /// Rule whose message is built from the failing value.
    pub fn with_message_fn<P, M>(predicate: P, message: M) -> Self
    where
        P: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
        M: Fn(&Value) -> Message + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: RuleMessage::Computed(Arc::new(message)),
        }
    }

    /// Run the check. Returns the failure message when the rule fails.
    pub fn check(&self, value: &Value, all: &Value) -> Option<Message> {
        if (self.predicate)(value, all) {
            None
        } else {
            Some(self.message.resolve(value))
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Declarative rules per field path.
///
/// Rule order within a field only decides message order; every rule of a
/// field is evaluated.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: BTreeMap<FieldPath, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules for a field.
    pub fn field<I>(mut self, path: impl Into<FieldPath>, rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        self.fields.entry(path.into()).or_default().extend(rules);
        self
    }

    /// Append a single rule for a field.
    pub fn rule(self, path: impl Into<FieldPath>, rule: Rule) -> Self {
        self.field(path, [rule])
    }

    /// Rules declared for `path`, empty when none are.
    pub fn rules_for(&self, path: &FieldPath) -> &[Rule] {
        self.fields.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Paths that have rules, in order.
    pub fn paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
