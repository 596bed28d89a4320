//! Structural errors.
//!
//! Validation failures are data (see [`crate::tree::ErrorTree`]); the errors
//! here mean the caller wired something up wrongly and are returned rather
//! than folded into the message model.

use thiserror::Error;

use crate::config::ConfigError;
use crate::tree::FieldPath;

/// Errors that interrupt form processing.
#[derive(Debug, Error)]
pub enum FormError {
    /// The initial values were not a JSON object.
    #[error("Form values must be an object, got {found}")]
    NotAnObject { found: &'static str },

    /// A field-scoped action named a path that is not a leaf of the values.
    #[error("Field '{path}' does not exist in the form values")]
    UnknownField { path: FieldPath },

    /// A write would have to pass through an existing leaf value.
    #[error("Cannot write '{path}': '{conflict}' holds a value, not a group of fields")]
    PathConflict { path: FieldPath, conflict: FieldPath },

    /// An async check was requested for a field without an async rule.
    #[error("No async rule declared for field '{path}'")]
    UndeclaredAsyncField { path: FieldPath },

    /// A pattern rule was built from an invalid regular expression.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The controller task is gone.
    #[error("Form controller has shut down")]
    Disconnected,

    /// Options could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = FormError::UnknownField {
            path: FieldPath::parse("address.zip"),
        };
        assert_eq!(
            err.to_string(),
            "Field 'address.zip' does not exist in the form values"
        );

        let err = FormError::PathConflict {
            path: FieldPath::parse("name.first"),
            conflict: FieldPath::parse("name"),
        };
        assert!(err.to_string().contains("'name' holds a value"));
    }
}
