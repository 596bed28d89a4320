//! Value trees, error trees and the paths that address them.

mod errors;
mod path;
mod values;

pub use errors::{init_errors, ErrorTree, Message};
pub use path::FieldPath;
pub use values::{is_leaf, kind_name, leaf_paths, merge_values, owning_field, set_value_at, value_at};
