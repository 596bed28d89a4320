//! Form options and their TOML loader.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{FormOptions, ValidateOnChange};
