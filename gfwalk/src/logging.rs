//! Logging setup.
//!
//! The library only emits `tracing` events; binaries call [`init_logging`]
//! once to install a subscriber. Console output is always on. A log file is
//! added when [`LogConfig::log_file`] is set; its writer is non-blocking and
//! flushed when the returned [`LoggingGuard`] is dropped.

use std::path::PathBuf;

use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "gfwalk=info,gfwalk_cli=info";

/// Filter used when `RUST_LOG` is unset and verbose output is requested.
pub const VERBOSE_FILTER: &str = "gfwalk=debug,gfwalk_cli=debug";

/// Logging options.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Use the debug-level default filter.
    pub verbose: bool,
    /// Also write plain-text logs to this file.
    pub log_file: Option<PathBuf>,
}

/// Errors installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log file path has no file name component.
    #[error("Invalid log file path: {0}")]
    InvalidPath(PathBuf),

    /// A global subscriber is already installed.
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

/// Keeps the file writer alive; drop it at shutdown to flush.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Build the env filter for `config`.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    let default = if config.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuard, LoggingError> {
    let console = fmt::layer()
        .with_timer(LocalTime::new(Rfc3339))
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, file_guard) = match &config.log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidPath(path.clone()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_timer(LocalTime::new(Rfc3339))
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LoggingGuard { _file: file_guard })
}
