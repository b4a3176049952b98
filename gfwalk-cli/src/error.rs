//! CLI error type.

use thiserror::Error;

use gfwalk::catalog::CatalogError;
use gfwalk::config::ConfigError;
use gfwalk::logging::LoggingError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded, saved or validated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The point catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: CliError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_logging_error_converts() {
        let err: CliError = LoggingError::Init("already set".to_string()).into();
        assert!(matches!(err, CliError::Logging(_)));
        assert!(err.to_string().contains("already set"));
    }
}
