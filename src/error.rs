//! Error types for the optimizer.
//!
//! Parsing and rule evaluation never fail; only the boundaries (reading the
//! Dockerfile or a history report, loading configuration, rendering) do.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// An input file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output could not be rendered
    #[error("Failed to render output: {0}")]
    Render(String),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl From<serde_json::Error> for OptimizerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message() {
        let err = OptimizerError::Io {
            path: PathBuf::from("Dockerfile"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "Failed to read Dockerfile: not found");
    }

    #[test]
    fn test_config_error_converts() {
        let err: OptimizerError = ConfigError::Parse {
            path: PathBuf::from("x.toml"),
            message: "bad".to_string(),
        }
        .into();
        assert!(err.to_string().contains("Invalid config file x.toml: bad"));
    }
}
