//! Error trees: per-field message lists shaped like the values tree.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::path::FieldPath;

/// A user-facing validation message.
pub type Message = String;

/// Message lists laid out in the same shape as the form's values.
///
/// Serializes as plain JSON: branches become objects, leaves become arrays
/// of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorTree {
    Leaf(Vec<Message>),
    Branch(BTreeMap<String, ErrorTree>),
}

impl Default for ErrorTree {
    fn default() -> Self {
        ErrorTree::Branch(BTreeMap::new())
    }
}

/// Build an error tree congruent with `values`, every leaf an empty list.
pub fn init_errors(values: &Value) -> ErrorTree {
    match values {
        Value::Object(map) => ErrorTree::Branch(
            map.iter()
                .map(|(key, value)| (key.clone(), init_errors(value)))
                .collect(),
        ),
        _ => ErrorTree::Leaf(Vec::new()),
    }
}

impl ErrorTree {
    /// A tree holding `messages` at `path` and nothing else.
    pub fn at_path(path: &FieldPath, messages: Vec<Message>) -> Self {
        path.segments()
            .iter()
            .rev()
            .fold(ErrorTree::Leaf(messages), |inner, segment| {
                ErrorTree::Branch(BTreeMap::from([(segment.clone(), inner)]))
            })
    }

    pub fn get(&self, path: &FieldPath) -> Option<&ErrorTree> {
        let mut current = self;
        for segment in path.segments() {
            match current {
                ErrorTree::Branch(children) => current = children.get(segment)?,
                ErrorTree::Leaf(_) => return None,
            }
        }
        Some(current)
    }

    /// Messages stored at a leaf slot.
    pub fn messages(&self, path: &FieldPath) -> Option<&[Message]> {
        match self.get(path)? {
            ErrorTree::Leaf(messages) => Some(messages),
            ErrorTree::Branch(_) => None,
        }
    }

    /// Replace the messages of an existing leaf slot.
    ///
    /// Returns `false` (and changes nothing) when `path` is not a leaf.
    pub fn set(&mut self, path: &FieldPath, messages: Vec<Message>) -> bool {
        let mut current = self;
        for segment in path.segments() {
            match current {
                ErrorTree::Branch(children) => match children.get_mut(segment) {
                    Some(child) => current = child,
                    None => return false,
                },
                ErrorTree::Leaf(_) => return false,
            }
        }
        match current {
            ErrorTree::Leaf(slot) => {
                *slot = messages;
                true
            }
            ErrorTree::Branch(_) => false,
        }
    }

    /// Deep merge: branches merge key by key, a leaf in `other` replaces
    /// whatever sits at the same position here.
    pub fn merge(&mut self, other: ErrorTree) {
        match (self, other) {
            (ErrorTree::Branch(existing), ErrorTree::Branch(incoming)) => {
                for (key, subtree) in incoming {
                    match existing.get_mut(&key) {
                        Some(slot) => slot.merge(subtree),
                        None => {
                            existing.insert(key, subtree);
                        }
                    }
                }
            }
            (slot, incoming) => *slot = incoming,
        }
    }

    /// Reshape to match `values`: leaves present in both keep their
    /// messages, new leaves start empty, vanished ones are dropped.
    pub fn conform(&self, values: &Value) -> ErrorTree {
        match (self, values) {
            (ErrorTree::Branch(children), Value::Object(map)) => ErrorTree::Branch(
                map.iter()
                    .map(|(key, value)| {
                        let subtree = match children.get(key) {
                            Some(existing) => existing.conform(value),
                            None => init_errors(value),
                        };
                        (key.clone(), subtree)
                    })
                    .collect(),
            ),
            (ErrorTree::Leaf(messages), value) if !value.is_object() => {
                ErrorTree::Leaf(messages.clone())
            }
            (_, value) => init_errors(value),
        }
    }

    /// True when every leaf holds no messages.
    pub fn is_clear(&self) -> bool {
        match self {
            ErrorTree::Leaf(messages) => messages.is_empty(),
            ErrorTree::Branch(children) => children.values().all(ErrorTree::is_clear),
        }
    }

    /// Paths of every leaf, in key order.
    pub fn leaf_paths(&self) -> Vec<FieldPath> {
        self.leaves().into_iter().map(|(path, _)| path).collect()
    }

    /// Every leaf with its messages, in key order.
    pub fn leaves(&self) -> Vec<(FieldPath, &[Message])> {
        let mut out = Vec::new();
        self.collect_leaves(FieldPath::default(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: FieldPath, out: &mut Vec<(FieldPath, &'a [Message])>) {
        match self {
            ErrorTree::Leaf(messages) => out.push((prefix, messages)),
            ErrorTree::Branch(children) => {
                for (key, child) in children {
                    child.collect_leaves(prefix.child(key.as_str()), out);
                }
            }
        }
    }
}
