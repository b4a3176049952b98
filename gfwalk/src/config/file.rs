//! INI configuration file.
//!
//! ```text
//! [legacy]
//! interactive_km = 0.6
//! visible_km = 3.0
//!
//! [remote]
//! interactive_km = 0.1
//! visible_km = 0.5
//! start_lat = 35.41
//! start_lon = 136.76
//! step_size_deg = 0.0005
//! entry = reseed
//!
//! [acquisition]
//! timeout_ms = 5000
//! maximum_age_ms = 0
//! high_accuracy = true
//!
//! [stepping]
//! initial_delay_ms = 100
//! interval_ms = 200
//!
//! [catalog]
//! path = /path/to/markers.json
//! ```
//!
//! Missing sections and keys take their defaults; unknown keys are ignored.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use tracing::debug;

use crate::discovery::Thresholds;
use crate::geo::Coordinate;
use crate::mode::{
    ModeProfile, RemoteEntry, RemoteProfile, DEFAULT_LEGACY_THRESHOLDS, DEFAULT_REMOTE_START,
    DEFAULT_REMOTE_THRESHOLDS, DEFAULT_STEP_SIZE_DEG,
};
use crate::position::{
    AcquisitionOptions, SteppingConfig, DEFAULT_ACQUISITION_TIMEOUT, DEFAULT_INITIAL_DELAY,
    DEFAULT_REPEAT_INTERVAL,
};

use super::{ConfigError, EngineConfig};

/// File name inside the per-user configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default configuration file location: `<config dir>/gfwalk/config.ini`.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("gfwalk").join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// `[legacy]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSettings {
    pub interactive_km: f64,
    pub visible_km: f64,
}

impl ThresholdSettings {
    fn from_thresholds(t: Thresholds) -> Self {
        Self {
            interactive_km: t.interactive_km,
            visible_km: t.visible_km,
        }
    }

    fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.interactive_km, self.visible_km)
    }
}

/// `[remote]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSettings {
    pub interactive_km: f64,
    pub visible_km: f64,
    pub start_lat: f64,
    pub start_lon: f64,
    pub step_size_deg: f64,
    pub entry: RemoteEntry,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            interactive_km: DEFAULT_REMOTE_THRESHOLDS.interactive_km,
            visible_km: DEFAULT_REMOTE_THRESHOLDS.visible_km,
            start_lat: DEFAULT_REMOTE_START.lat,
            start_lon: DEFAULT_REMOTE_START.lon,
            step_size_deg: DEFAULT_STEP_SIZE_DEG,
            entry: RemoteEntry::default(),
        }
    }
}

/// `[acquisition]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionSettings {
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
    pub high_accuracy: bool,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ACQUISITION_TIMEOUT.as_millis() as u64,
            maximum_age_ms: 0,
            high_accuracy: true,
        }
    }
}

/// `[stepping]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SteppingSettings {
    pub initial_delay_ms: u64,
    pub interval_ms: u64,
}

impl Default for SteppingSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: DEFAULT_INITIAL_DELAY.as_millis() as u64,
            interval_ms: DEFAULT_REPEAT_INTERVAL.as_millis() as u64,
        }
    }
}

/// `[catalog]` section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSettings {
    /// JSON dataset to load instead of the bundled one.
    pub path: Option<PathBuf>,
}

/// The configuration file, section by section.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub legacy: ThresholdSettings,
    pub remote: RemoteSettings,
    pub acquisition: AcquisitionSettings,
    pub stepping: SteppingSettings,
    pub catalog: CatalogSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            legacy: ThresholdSettings::from_thresholds(DEFAULT_LEGACY_THRESHOLDS),
            remote: RemoteSettings::default(),
            acquisition: AcquisitionSettings::default(),
            stepping: SteppingSettings::default(),
            catalog: CatalogSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Load from the default location, or defaults if the file is absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini_str(&text)?;
        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let defaults = Self::default();

        Ok(Self {
            legacy: ThresholdSettings {
                interactive_km: read(&ini, "legacy", "interactive_km", defaults.legacy.interactive_km)?,
                visible_km: read(&ini, "legacy", "visible_km", defaults.legacy.visible_km)?,
            },
            remote: RemoteSettings {
                interactive_km: read(&ini, "remote", "interactive_km", defaults.remote.interactive_km)?,
                visible_km: read(&ini, "remote", "visible_km", defaults.remote.visible_km)?,
                start_lat: read(&ini, "remote", "start_lat", defaults.remote.start_lat)?,
                start_lon: read(&ini, "remote", "start_lon", defaults.remote.start_lon)?,
                step_size_deg: read(&ini, "remote", "step_size_deg", defaults.remote.step_size_deg)?,
                entry: read(&ini, "remote", "entry", defaults.remote.entry)?,
            },
            acquisition: AcquisitionSettings {
                timeout_ms: read(&ini, "acquisition", "timeout_ms", defaults.acquisition.timeout_ms)?,
                maximum_age_ms: read(
                    &ini,
                    "acquisition",
                    "maximum_age_ms",
                    defaults.acquisition.maximum_age_ms,
                )?,
                high_accuracy: read(
                    &ini,
                    "acquisition",
                    "high_accuracy",
                    defaults.acquisition.high_accuracy,
                )?,
            },
            stepping: SteppingSettings {
                initial_delay_ms: read(
                    &ini,
                    "stepping",
                    "initial_delay_ms",
                    defaults.stepping.initial_delay_ms,
                )?,
                interval_ms: read(&ini, "stepping", "interval_ms", defaults.stepping.interval_ms)?,
            },
            catalog: CatalogSettings {
                path: ini
                    .section(Some("catalog"))
                    .and_then(|s| s.get("path"))
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from),
            },
        })
    }

    /// Render as INI text.
    pub fn to_ini_string(&self) -> String {
        let ini = self.to_ini();
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = ini.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_ini_string()).map_err(io_err)
    }

    /// Every setting as `(section.key, value)`, in file order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let ini = self.to_ini();
        let mut entries = Vec::new();
        for (section, props) in ini.iter() {
            let Some(section) = section else { continue };
            for (key, value) in props.iter() {
                entries.push((format!("{}.{}", section, key), value.to_string()));
            }
        }
        entries
    }

    /// Build and validate the engine configuration.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            legacy: ModeProfile {
                thresholds: self.legacy.thresholds(),
            },
            remote: RemoteProfile {
                thresholds: Thresholds::new(self.remote.interactive_km, self.remote.visible_km),
                start: Coordinate::new(self.remote.start_lat, self.remote.start_lon),
                step_size_deg: self.remote.step_size_deg,
                entry: self.remote.entry,
            },
            acquisition: AcquisitionOptions {
                timeout: Duration::from_millis(self.acquisition.timeout_ms),
                maximum_age: Duration::from_millis(self.acquisition.maximum_age_ms),
                high_accuracy: self.acquisition.high_accuracy,
            },
            stepping: SteppingConfig {
                initial_delay: Duration::from_millis(self.stepping.initial_delay_ms),
                interval: Duration::from_millis(self.stepping.interval_ms),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("legacy"))
            .set("interactive_km", self.legacy.interactive_km.to_string())
            .set("visible_km", self.legacy.visible_km.to_string());
        ini.with_section(Some("remote"))
            .set("interactive_km", self.remote.interactive_km.to_string())
            .set("visible_km", self.remote.visible_km.to_string())
            .set("start_lat", self.remote.start_lat.to_string())
            .set("start_lon", self.remote.start_lon.to_string())
            .set("step_size_deg", self.remote.step_size_deg.to_string())
            .set("entry", self.remote.entry.to_string());
        ini.with_section(Some("acquisition"))
            .set("timeout_ms", self.acquisition.timeout_ms.to_string())
            .set("maximum_age_ms", self.acquisition.maximum_age_ms.to_string())
            .set("high_accuracy", self.acquisition.high_accuracy.to_string());
        ini.with_section(Some("stepping"))
            .set("initial_delay_ms", self.stepping.initial_delay_ms.to_string())
            .set("interval_ms", self.stepping.interval_ms.to_string());
        if let Some(path) = &self.catalog.path {
            ini.with_section(Some("catalog"))
                .set("path", path.display().to_string());
        }
        ini
    }
}

/// Read `section.key`, falling back to `default` when absent.
fn read<T: FromStr>(ini: &Ini, section: &str, key: &str, default: T) -> Result<T, ConfigError> {
    match ini.section(Some(section)).and_then(|s| s.get(key)) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
