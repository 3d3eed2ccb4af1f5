//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Named class list requested but never configured
    #[error("Unknown class list '{name}'. Check `has_class_list` first or add it to the class_lists file")]
    UnknownClassList { name: String },

    /// IO error while reading the top-level configuration document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error in the top-level configuration document
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create an unknown class list error
    pub fn unknown_class_list(name: impl Into<String>) -> Self {
        Self::UnknownClassList { name: name.into() }
    }
}
