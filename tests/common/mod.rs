//! Shared fixtures: the registration form and recording async rules.

#![allow(dead_code, unused_imports)]

use parking_lot::Mutex;
use revalidate::rules::builtin::{equals_field, has_capital_letter, is_not_empty, length_greater_than};
use revalidate::{AsyncRuleError, AsyncRuleSet, FieldPath, FormState, Message, Rule, RuleSet};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const NAME_REQUIRED: &str = "Name should not be empty.";
pub const PASSWORD_TOO_SHORT: &str = "Minimum Password length of 6 is required.";
pub const PASSWORD_NO_CAPITAL: &str = "Password should contain at least one uppercase letter.";
pub const REPEAT_NOT_EQUAL: &str = "RepeatPassword should be equal with Password";

pub fn path(raw: &str) -> FieldPath {
    FieldPath::parse(raw)
}

pub fn messages(items: &[&str]) -> Vec<Message> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Empty registration form.
pub fn registration_values() -> Value {
    json!({"name": "", "password": "", "repeatPassword": ""})
}

/// Rules of the registration form.
pub fn registration_rules() -> RuleSet {
    RuleSet::new()
        .rule("name", Rule::new(is_not_empty, NAME_REQUIRED))
        .field(
            "password",
            [
                Rule::new(length_greater_than(5), PASSWORD_TOO_SHORT),
                Rule::new(has_capital_letter, PASSWORD_NO_CAPITAL),
            ],
        )
        .field(
            "repeatPassword",
            [
                Rule::new(
                    length_greater_than(5),
                    "Minimum RepeatedPassword length of 6 is required.",
                ),
                Rule::new(
                    has_capital_letter,
                    "RepeatedPassword should contain at least one uppercase letter.",
                ),
                Rule::new(equals_field("password"), REPEAT_NOT_EQUAL),
            ],
        )
}

/// Values passed to an async rule, in call order.
pub type CallLog = Arc<Mutex<Vec<Value>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn taken_message(name: &str) -> Message {
    format!("{name} is already taken.")
}

/// Async rule for `field` that records each value, waits `latency` and
/// reports `taken` values as unavailable.
pub fn availability_rule(field: &str, taken: &'static [&'static str], latency: Duration, calls: CallLog) -> AsyncRuleSet {
    AsyncRuleSet::new().field(field, move |value: Value, _state: FormState| {
        calls.lock().push(value.clone());
        async move {
            tokio::time::sleep(latency).await;
            let name = value.as_str().unwrap_or_default();
            let messages = if taken.iter().any(|t| *t == name) {
                vec![taken_message(name)]
            } else {
                Vec::new()
            };
            Ok::<Vec<Message>, AsyncRuleError>(messages)
        }
    })
}

/// Async rule for `field` whose check always fails to complete.
pub fn broken_rule(field: &str) -> AsyncRuleSet {
    AsyncRuleSet::new().field(field, |_value: Value, _state: FormState| async {
        Err::<Vec<Message>, _>(AsyncRuleError::new("service unavailable"))
    })
}
