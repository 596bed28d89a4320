//! Tests for error trees: initial shape, merging and reshaping.

mod common;

use common::*;
use revalidate::tree::leaf_paths;
use revalidate::{init_errors, ErrorTree, FieldPath};
use serde_json::json;

#[test]
fn init_errors_mirrors_values() {
    let values = json!({
        "name": "Ada",
        "address": {"street": "Main", "zip": 1000},
        "tags": ["a", "b"],
        "newsletter": false,
        "middleName": null
    });
    let errors = init_errors(&values);

    assert_eq!(errors.leaf_paths(), leaf_paths(&values));
    assert!(errors.leaves().iter().all(|(_, messages)| messages.is_empty()));
    assert_eq!(
        serde_json::to_value(&errors).unwrap(),
        json!({
            "name": [],
            "address": {"street": [], "zip": []},
            "tags": [],
            "newsletter": [],
            "middleName": []
        })
    );
}

#[test]
fn empty_form_has_empty_tree() {
    let errors = init_errors(&json!({}));
    assert_eq!(errors, ErrorTree::default());
    assert!(errors.is_clear());
}

#[test]
fn conform_keeps_surviving_messages() {
    let mut errors = init_errors(&registration_values());
    errors.merge(ErrorTree::at_path(&path("name"), messages(&[NAME_REQUIRED])));

    let reshaped = errors.conform(&json!({"name": "", "email": ""}));
    assert_eq!(reshaped.messages(&path("name")), Some(&messages(&[NAME_REQUIRED])[..]));
    assert_eq!(reshaped.messages(&path("email")), Some(&[][..]));
    assert!(reshaped.get(&path("password")).is_none());
}

#[test]
fn conform_replaces_leaf_that_became_group() {
    let mut errors = init_errors(&json!({"address": ""}));
    errors.set(&path("address"), messages(&["required"]));

    let reshaped = errors.conform(&json!({"address": {"zip": ""}}));
    assert_eq!(
        serde_json::to_value(&reshaped).unwrap(),
        json!({"address": {"zip": []}})
    );
}

#[test]
fn set_only_touches_existing_leaves() {
    let mut errors = init_errors(&json!({"address": {"zip": ""}}));
    assert!(!errors.set(&path("address"), messages(&["group"])));
    assert!(!errors.set(&path("missing"), messages(&["missing"])));
    assert!(errors.set(&path("address.zip"), messages(&["bad zip"])));
    assert!(!errors.is_clear());
}

#[test]
fn dotted_keys_are_single_segments() {
    let errors = init_errors(&json!({"a.b": "", "a": {"b": ""}}));
    let dotted = FieldPath::from_segments(["a.b"]);

    assert_eq!(errors.messages(&dotted), Some(&[][..]));
    assert!(errors.leaf_paths().contains(&dotted));
    assert!(errors.leaf_paths().contains(&path("a.b")));
    assert_eq!(errors.leaf_paths().len(), 2);
}
