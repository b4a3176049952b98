//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a point catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read the catalog file.
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the record format.
    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records share the same identity.
    #[error("Duplicate point id '{0}'")]
    DuplicateId(String),

    /// A record has an empty identity.
    #[error("Point at index {0} has an empty id")]
    EmptyId(usize),
}
