/// Structured error types for tierlist-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (tierlist-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tierlist-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Config parse error in {path:?}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    /// Required configuration value missing
    #[error("Missing configuration value '{key}'")]
    MissingConfig { key: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for tierlist-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing config error
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::missing_config("DATABASE_URL");
        assert_eq!(err.to_string(), "Missing configuration value 'DATABASE_URL'");

        let err = CoreError::config_parse("/tmp/tierlist.toml", "expected table");
        assert!(err.to_string().contains("Config parse error"));
        assert!(err.to_string().contains("/tmp/tierlist.toml"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let core_err: CoreError = io_err.into();

        assert!(matches!(core_err, CoreError::Io { .. }));
    }
}
