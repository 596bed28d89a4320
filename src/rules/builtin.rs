//! Built-in predicates for common field checks.
//!
//! Each function returns a predicate usable with [`Rule::new`]. String checks
//! count characters, not bytes.
//!
//! [`Rule::new`]: super::Rule::new

use regex::Regex;
use serde_json::Value;

use crate::error::FormError;
use crate::tree::{value_at, FieldPath};

/// Not null, not blank, not an empty array or object.
pub fn is_not_empty(value: &Value, _all: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// String longer than `len` characters.
pub fn length_greater_than(len: usize) -> impl Fn(&Value, &Value) -> bool + Send + Sync + 'static {
    move |value: &Value, _: &Value| value.as_str().is_some_and(|text| text.chars().count() > len)
}

/// String with at least one uppercase letter.
pub fn has_capital_letter(value: &Value, _all: &Value) -> bool {
    value.as_str().is_some_and(|text| text.chars().any(char::is_uppercase))
}

/// Equal to the value stored at another field.
pub fn equals_field(other: &str) -> impl Fn(&Value, &Value) -> bool + Send + Sync + 'static {
    let other = FieldPath::parse(other);
    move |value: &Value, all: &Value| value_at(all, &other) == Some(value)
}

/// String matching a regular expression.
pub fn matches_pattern(pattern: &str) -> Result<impl Fn(&Value, &Value) -> bool + Send + Sync + 'static, FormError> {
    let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(move |value: &Value, _: &Value| value.as_str().is_some_and(|text| regex.is_match(text)))
}
