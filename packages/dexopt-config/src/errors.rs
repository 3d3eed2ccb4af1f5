//! Error types for dexopt-config
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for dexopt-config operations
#[derive(Debug, Error)]
pub enum DexoptError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for dexopt operations
pub type Result<T> = std::result::Result<T, DexoptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err: DexoptError = ConfigError::unknown_class_list("hot.list").into();
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error"));
        assert!(msg.contains("hot.list"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: DexoptError = io_err.into();
        assert!(matches!(err, DexoptError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
