use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::FormOptions;

/// Longest accepted debounce period.
const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Errors that can occur when loading form options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl FormOptions {
    /// Loads options from `path`.
    ///
    /// - If the file doesn't exist, returns `FormOptions::default()`.
    /// - Otherwise behaves like [`FormOptions::load_from`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Options file missing, using defaults");
            return Ok(FormOptions::default());
        }
        Self::load_from(path)
    }

    /// Reads, parses and validates an options file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options: FormOptions = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        options.validate()?;
        Ok(options)
    }

    /// Validates the options.
    ///
    /// Checks:
    /// - The async failure message is not blank
    /// - The debounce period is at most one minute
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.async_failure_message.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "async_failure_message must not be empty".to_string(),
            });
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "debounce_ms must be at most {} (got {})",
                    MAX_DEBOUNCE_MS, self.debounce_ms
                ),
            });
        }

        Ok(())
    }
}
