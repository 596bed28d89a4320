//! Base trait for reducer-owned state.

/// Marker trait for state objects.
///
/// Models should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (everything a view needs)
/// - Comparable (PartialEq, so transitions can be checked for determinism)
pub trait Model: Clone + PartialEq + Default + Send + 'static {}
