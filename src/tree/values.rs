//! Helpers over the form's value tree.
//!
//! Values are plain `serde_json::Value`s: an object is a nested group of
//! fields, anything else (string, number, bool, null, array) is a leaf.

use serde_json::{Map, Value};

use crate::error::FormError;

use super::path::FieldPath;

/// Look up the value at `path`. Array elements are addressed by index.
pub fn value_at<'a>(values: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = values;
    for segment in path.segments() {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Whether `path` names a leaf (a non-object value) of the tree.
pub fn is_leaf(values: &Value, path: &FieldPath) -> bool {
    if path.is_root() {
        return false;
    }
    // Leaves live directly under objects; array elements are part of their leaf.
    let mut current = values;
    for segment in path.segments() {
        match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => current = next,
                None => return false,
            },
            _ => return false,
        }
    }
    !current.is_object()
}

/// The field that owns `path`: the path cut after its first leaf.
///
/// `tags[1]` belongs to the `tags` field when `tags` is an array. Paths that
/// stay inside groups, or that do not exist yet, are returned unchanged.
pub fn owning_field(values: &Value, path: &FieldPath) -> FieldPath {
    let mut current = values;
    let mut walked = FieldPath::default();
    for segment in path.segments() {
        let Value::Object(map) = current else {
            return walked;
        };
        match map.get(segment) {
            Some(next) => {
                current = next;
                walked = walked.child(segment.as_str());
            }
            None => return path.clone(),
        }
    }
    walked
}

/// Write `value` at `path`, creating intermediate groups as needed.
///
/// Array elements are replaced by index, and the index one past the end
/// appends. Writing through any other leaf is a structural error.
pub fn set_value_at(values: &mut Value, path: &FieldPath, value: Value) -> Result<(), FormError> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(FormError::UnknownField { path: path.clone() });
    };

    let mut current = values;
    let mut walked = FieldPath::default();
    for segment in parents {
        current = match current {
            Value::Object(map) => map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => {
                let index = array_index(segment, items.len(), path)?;
                items
                    .get_mut(index)
                    .ok_or_else(|| FormError::UnknownField { path: path.clone() })?
            }
            _ => {
                return Err(FormError::PathConflict {
                    path: path.clone(),
                    conflict: walked,
                })
            }
        };
        walked = walked.child(segment.as_str());
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = array_index(last, items.len(), path)?;
            match items.get_mut(index) {
                Some(slot) => *slot = value,
                None => items.push(value),
            }
            Ok(())
        }
        _ => Err(FormError::PathConflict {
            path: path.clone(),
            conflict: walked,
        }),
    }
}

/// Index into an array of `len` items, allowing `len` itself for appends.
fn array_index(segment: &str, len: usize, path: &FieldPath) -> Result<usize, FormError> {
    match segment.parse::<usize>() {
        Ok(index) if index <= len => Ok(index),
        _ => Err(FormError::UnknownField { path: path.clone() }),
    }
}

/// Deep-merge `partial` into `target`: objects merge key by key, every other
/// value replaces what was there.
pub fn merge_values(target: &mut Value, partial: Value) {
    match (target, partial) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge_values(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Every leaf path of the tree, in key order.
pub fn leaf_paths(values: &Value) -> Vec<FieldPath> {
    let mut paths = Vec::new();
    collect_leaves(values, &FieldPath::default(), &mut paths);
    paths
}

fn collect_leaves(value: &Value, prefix: &FieldPath, out: &mut Vec<FieldPath>) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                collect_leaves(&map[key], &prefix.child(key.as_str()), out);
            }
        }
        _ if prefix.is_root() => {}
        _ => out.push(prefix.clone()),
    }
}

/// Human-readable name of a JSON value's kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_at_walks_objects_and_arrays() {
        let values = json!({"user": {"tags": ["a", "b"]}});
        assert_eq!(
            value_at(&values, &FieldPath::parse("user.tags[1]")),
            Some(&json!("b"))
        );
        assert_eq!(value_at(&values, &FieldPath::parse("user.missing")), None);
    }

    #[test]
    fn is_leaf_distinguishes_groups() {
        let values = json!({"name": "", "address": {"zip": "123"}});
        assert!(is_leaf(&values, &FieldPath::parse("name")));
        assert!(is_leaf(&values, &FieldPath::parse("address.zip")));
        assert!(!is_leaf(&values, &FieldPath::parse("address")));
        assert!(!is_leaf(&values, &FieldPath::parse("nope")));
    }

    #[test]
    fn set_value_creates_intermediate_groups() {
        let mut values = json!({});
        set_value_at(&mut values, &FieldPath::parse("address.zip"), json!("1000")).unwrap();
        assert_eq!(values, json!({"address": {"zip": "1000"}}));
    }

    #[test]
    fn set_value_through_leaf_is_conflict() {
        let mut values = json!({"name": "Ada"});
        let err = set_value_at(&mut values, &FieldPath::parse("name.first"), json!("A")).unwrap_err();
        assert!(matches!(err, FormError::PathConflict { ref conflict, .. } if conflict.to_string() == "name"));
    }

    #[test]
    fn set_value_replaces_array_elements() {
        let mut values = json!({"tags": ["a", "b"], "rows": [{"x": 1}]});
        set_value_at(&mut values, &FieldPath::parse("tags[1]"), json!("c")).unwrap();
        set_value_at(&mut values, &FieldPath::parse("tags[2]"), json!("d")).unwrap();
        set_value_at(&mut values, &FieldPath::parse("rows[0].x"), json!(2)).unwrap();
        assert_eq!(values, json!({"tags": ["a", "c", "d"], "rows": [{"x": 2}]}));

        let err = set_value_at(&mut values, &FieldPath::parse("tags[9]"), json!("z")).unwrap_err();
        assert!(matches!(err, FormError::UnknownField { .. }));
        let err = set_value_at(&mut values, &FieldPath::parse("tags.first"), json!("z")).unwrap_err();
        assert!(matches!(err, FormError::UnknownField { .. }));
    }

    #[test]
    fn owning_field_stops_at_first_leaf() {
        let values = json!({"tags": ["a"], "address": {"zip": "1"}});
        assert_eq!(owning_field(&values, &FieldPath::parse("tags[0]")).to_string(), "tags");
        assert_eq!(owning_field(&values, &FieldPath::parse("address.zip")).to_string(), "address.zip");
        assert_eq!(owning_field(&values, &FieldPath::parse("address.city")).to_string(), "address.city");
    }

    #[test]
    fn merge_is_deep() {
        let mut values = json!({"name": "a", "address": {"zip": "1", "city": "x"}});
        merge_values(&mut values, json!({"address": {"zip": "2"}, "extra": true}));
        assert_eq!(
            values,
            json!({"name": "a", "address": {"zip": "2", "city": "x"}, "extra": true})
        );
    }

    #[test]
    fn leaf_paths_are_sorted() {
        let values = json!({"b": 1, "a": {"y": [], "x": null}});
        let paths: Vec<String> = leaf_paths(&values).iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, ["a.x", "a.y", "b"]);
    }
}
