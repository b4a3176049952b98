//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A value could not be interpreted.
    #[error("Invalid value '{value}' for {section}.{key}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// The values parse but do not form a usable configuration.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No per-user configuration directory exists on this platform.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}
