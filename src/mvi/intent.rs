//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (field edits, submit)
/// - System events (async validation results)
///
/// Intents are processed by reducers to produce new models.
pub trait Intent: Send + 'static {}
