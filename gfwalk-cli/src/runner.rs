//! Shared command setup: configuration and catalog resolution.

use std::path::{Path, PathBuf};

use tracing::info;

use gfwalk::catalog::PointCatalog;
use gfwalk::config::{ConfigFile, EngineConfig};

use crate::error::CliError;

/// Resolved inputs for a command run.
pub struct CliRunner {
    config: ConfigFile,
    engine_config: EngineConfig,
    catalog_override: Option<PathBuf>,
}

impl CliRunner {
    /// Load configuration from `config_path`, or the default location.
    ///
    /// `catalog` overrides the catalog path from the configuration file.
    pub fn new(config_path: Option<&Path>, catalog: Option<PathBuf>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };
        let engine_config = config.to_engine_config()?;
        Ok(Self {
            config,
            engine_config,
            catalog_override: catalog,
        })
    }

    /// The validated engine configuration.
    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine_config
    }

    /// Log the command being run.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            catalog = ?self.catalog_path(),
            "gfwalk starting"
        );
    }

    /// Catalog path in effect, if any. `None` means the bundled dataset.
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_override
            .as_deref()
            .or(self.config.catalog.path.as_deref())
    }

    /// Load the catalog in effect.
    pub fn load_catalog(&self) -> Result<PointCatalog, CliError> {
        match self.catalog_path() {
            Some(path) => Ok(PointCatalog::load(path)?),
            None => Ok(PointCatalog::builtin()),
        }
    }
}
