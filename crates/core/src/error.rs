//! Error types for droidkit
//!
//! Centralized error handling using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::composer::ComposeError;

/// Main error type for the core crate
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invariant violation: {0}")]
    Compose(#[from] ComposeError),

    #[error("Failed to walk {path:?}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Io(e) => format!("File operation failed: {}", e),
            CoreError::Config(msg) => format!("Configuration error: {}", msg),
            CoreError::TomlParse(e) => format!("droidkit.toml is not valid: {}", e),
            CoreError::NotFound(msg) => format!("Not found: {}", msg),
            _ => self.to_string(),
        }
    }
}
