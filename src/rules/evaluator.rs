//! Single-field rule evaluation.

use serde::Serialize;
use serde_json::Value;

use crate::tree::Message;

use super::rule::Rule;

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "messages", rename_all = "snake_case")]
pub enum Verdict {
    /// No rule failed.
    Valid,
    /// Messages of every failed rule, in declaration order. Never empty.
    Invalid(Vec<Message>),
}

impl Verdict {
    /// `Valid` for an empty list, `Invalid` otherwise.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        if messages.is_empty() {
            Verdict::Valid
        } else {
            Verdict::Invalid(messages)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn messages(&self) -> &[Message] {
        match self {
            Verdict::Valid => &[],
            Verdict::Invalid(messages) => messages,
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Verdict::Valid => Vec::new(),
            Verdict::Invalid(messages) => messages,
        }
    }
}

/// Evaluate every rule against `value`; `all` is the complete values tree
/// so rules can compare against other fields.
pub fn evaluate(value: &Value, all: &Value, rules: &[Rule]) -> Verdict {
    Verdict::from_messages(rules.iter().filter_map(|rule| rule.check(value, all)).collect())
}
