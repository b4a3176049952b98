//! Engine configuration
//!
//! [`EngineConfig`] is the explicit configuration record handed to the
//! engine: per-mode thresholds, the simulated start and step, live
//! acquisition options and press-and-hold timing. Nothing here is global.
//!
//! [`ConfigFile`] is its on-disk INI form.

mod error;
mod file;

pub use error::ConfigError;
pub use file::{
    config_file_path, AcquisitionSettings, CatalogSettings, ConfigFile, RemoteSettings,
    SteppingSettings, ThresholdSettings, CONFIG_FILE_NAME,
};

use crate::discovery::Thresholds;
use crate::mode::{Mode, ModeProfile, RemoteProfile};
use crate::position::{AcquisitionOptions, SteppingConfig};

/// Complete configuration for a discovery engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    /// Live mode settings.
    pub legacy: ModeProfile,
    /// Simulated mode settings.
    pub remote: RemoteProfile,
    /// Live acquisition options.
    pub acquisition: AcquisitionOptions,
    /// Press-and-hold timing.
    pub stepping: SteppingConfig,
}

impl EngineConfig {
    /// Thresholds for `mode`.
    pub fn thresholds(&self, mode: Mode) -> Thresholds {
        match mode {
            Mode::Legacy => self.legacy.thresholds,
            Mode::Remote => self.remote.thresholds,
        }
    }

    /// Set the thresholds for `mode`.
    pub fn with_thresholds(mut self, mode: Mode, thresholds: Thresholds) -> Self {
        match mode {
            Mode::Legacy => self.legacy.thresholds = thresholds,
            Mode::Remote => self.remote.thresholds = thresholds,
        }
        self
    }

    /// Check that every threshold is a finite, non-negative distance.
    ///
    /// An interactive radius larger than the visible radius is accepted; the
    /// classifier clamps it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (mode, t) in [(Mode::Legacy, self.legacy.thresholds), (Mode::Remote, self.remote.thresholds)] {
            for (name, value) in [("interactive_km", t.interactive_km), ("visible_km", t.visible_km)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "{}.{} must be a non-negative distance, got {}",
                        mode, name, value
                    )));
                }
            }
        }
        if !self.remote.step_size_deg.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "remote.step_size_deg must be finite, got {}",
                self.remote.step_size_deg
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::mode::RemoteEntry;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.legacy.thresholds, Thresholds::new(0.6, 3.0));
        assert_eq!(config.remote.thresholds, Thresholds::new(0.1, 0.5));
        assert_eq!(config.remote.start, Coordinate::new(35.41, 136.76));
        assert_eq!(config.remote.step_size_deg, 0.0005);
        assert_eq!(config.remote.entry, RemoteEntry::Reseed);
        assert_eq!(config.acquisition.timeout, Duration::from_millis(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_thresholds() {
        let config = EngineConfig::default().with_thresholds(Mode::Remote, Thresholds::new(1.0, 2.0));
        assert_eq!(config.thresholds(Mode::Remote), Thresholds::new(1.0, 2.0));
        assert_eq!(config.thresholds(Mode::Legacy), Thresholds::new(0.6, 3.0));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let config = EngineConfig::default().with_thresholds(Mode::Legacy, Thresholds::new(-0.1, 3.0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("legacy.interactive_km"));
    }

    #[test]
    fn test_inverted_thresholds_accepted() {
        let config = EngineConfig::default().with_thresholds(Mode::Legacy, Thresholds::new(5.0, 1.0));
        assert!(config.validate().is_ok());
    }
}
