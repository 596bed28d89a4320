//! Field paths addressing leaves and subtrees of a form's value tree.

use std::fmt;

use serde::{Serialize, Serializer};

/// Address of a field inside the values tree.
///
/// Parsed from dot notation with optional array indices:
/// `"address.zip"` → `["address", "zip"]`, `"items[2].name"` →
/// `["items", "2", "name"]`. Ordering is lexicographic over segments, so
/// maps keyed by `FieldPath` iterate deterministically.
///
/// Keys containing `.` or `[` cannot be spelled in this syntax; build such
/// paths with [`FieldPath::from_segments`]. `Display` joins segments with
/// `.` as-is, so it does not round-trip through [`FieldPath::parse`] for
/// those keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dot / bracket path. Empty segments are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        for part in raw.split('.') {
            let mut rest = part;
            // "items[0][1]" → "items", "0", "1"
            while let Some(open) = rest.find('[') {
                // An unclosed bracket is kept verbatim as part of the segment.
                let Some(close) = rest[open..].find(']') else {
                    break;
                };
                let head = &rest[..open];
                if !head.is_empty() {
                    segments.push(head.to_string());
                }
                let index = &rest[open + 1..open + close];
                if !index.is_empty() {
                    segments.push(index.to_string());
                }
                rest = &rest[open + close + 1..];
            }
            if !rest.is_empty() {
                segments.push(rest.to_string());
            }
        }
        Self { segments }
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path extended by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Whether `self` equals `other` or lies beneath it.
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&FieldPath> for FieldPath {
    fn from(path: &FieldPath) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_path() {
        let path = FieldPath::parse("address.zip");
        assert_eq!(path.segments(), ["address", "zip"]);
        assert_eq!(path.to_string(), "address.zip");
    }

    #[test]
    fn parses_array_indices() {
        let path = FieldPath::parse("items[2].name");
        assert_eq!(path.segments(), ["items", "2", "name"]);

        let nested = FieldPath::parse("grid[0][1]");
        assert_eq!(nested.segments(), ["grid", "0", "1"]);
    }

    #[test]
    fn skips_empty_segments() {
        assert_eq!(FieldPath::parse("a..b").segments(), ["a", "b"]);
        let root = FieldPath::parse("");
        assert!(root.is_root());
        assert!(root.is_empty());
        assert_eq!(root.len(), 0);
        assert_eq!(FieldPath::parse("a.b").len(), 2);
    }

    #[test]
    fn dotted_keys_need_explicit_segments() {
        let path = FieldPath::from_segments(["a.b"]);
        assert_eq!(path.len(), 1);
        assert_ne!(path, FieldPath::parse("a.b"));
    }

    #[test]
    fn prefix_check() {
        let parent = FieldPath::parse("address");
        let child = parent.child("zip");
        assert!(child.starts_with(&parent));
        assert!(!parent.starts_with(&child));
    }
}
