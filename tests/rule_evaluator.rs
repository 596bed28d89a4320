//! Tests for single-field evaluation and whole-form validation.

mod common;

use common::*;
use revalidate::rules::builtin::{is_not_empty, matches_pattern};
use revalidate::rules::{all_valid, effective_rules, evaluate, validate, validate_field};
use revalidate::{FormError, Rule, RuleSet, Verdict};
use serde_json::json;

#[test]
fn empty_name_scenario() {
    let rules = RuleSet::new().rule("name", Rule::new(is_not_empty, NAME_REQUIRED));
    let verdicts = validate(&rules, &json!({"name": ""}));
    assert_eq!(verdicts[&path("name")], Verdict::Invalid(messages(&[NAME_REQUIRED])));
    assert!(!all_valid(&verdicts));
}

#[test]
fn every_failing_rule_is_reported_in_order() {
    let rules = registration_rules();
    let values = json!({"name": "Ada", "password": "abc", "repeatPassword": "xyz"});
    let verdict = evaluate(
        &values["repeatPassword"],
        &values,
        rules.rules_for(&path("repeatPassword")),
    );
    assert_eq!(
        verdict.messages(),
        [
            "Minimum RepeatedPassword length of 6 is required.",
            "RepeatedPassword should contain at least one uppercase letter.",
            REPEAT_NOT_EQUAL,
        ]
    );
}

#[test]
fn matching_passwords_are_valid() {
    let values = json!({"name": "Ada", "password": "Secret1", "repeatPassword": "Secret1"});
    let verdicts = validate(&registration_rules(), &values);
    assert!(verdicts.values().all(Verdict::is_valid));
    assert_eq!(verdicts.len(), 3);
}

#[test]
fn cross_field_rule_sees_current_values() {
    let rules = registration_rules();
    let values = json!({"name": "Ada", "password": "Secret1", "repeatPassword": "Secret2"});
    let verdict = validate_field(&rules, &values, &path("repeatPassword")).unwrap();
    assert_eq!(verdict, Verdict::Invalid(messages(&[REPEAT_NOT_EQUAL])));
}

#[test]
fn validate_is_idempotent() {
    let rules = registration_rules();
    let values = registration_values();
    assert_eq!(validate(&rules, &values), validate(&rules, &values));
}

#[test]
fn fields_without_rules_are_valid() {
    let rules = registration_rules();
    let values = json!({"name": "Ada", "nickname": ""});
    let effective = effective_rules(&rules, &values);
    assert!(effective[&path("nickname")].is_empty());
    assert_eq!(effective[&path("name")].len(), 1);
    // Rules declared for missing fields don't apply.
    assert!(!effective.contains_key(&path("password")));
}

#[test]
fn computed_messages_use_the_value() {
    let rules = RuleSet::new().rule(
        "age",
        Rule::with_message_fn(
            |value, _| value.as_u64().is_some_and(|age| age >= 18),
            |value| format!("{value} is under age"),
        ),
    );
    let verdicts = validate(&rules, &json!({"age": 16}));
    assert_eq!(verdicts[&path("age")], Verdict::Invalid(messages(&["16 is under age"])));
}

#[test]
fn pattern_rules() {
    let zip = matches_pattern(r"^\d{4}$").unwrap();
    let rules = RuleSet::new().rule("address.zip", Rule::new(zip, "Zip must have four digits."));
    let values = json!({"address": {"zip": "10a0"}});
    assert!(!validate_field(&rules, &values, &path("address.zip")).unwrap().is_valid());

    assert!(matches!(
        matches_pattern("[unclosed"),
        Err(FormError::InvalidPattern { .. })
    ));
}
