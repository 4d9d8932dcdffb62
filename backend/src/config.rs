//! Station configuration file support.
//!
//! This module reads the station location, refresh cadence, ephemeris source
//! and search bounds from a TOML configuration file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;

use crate::api::GeographicLocation;
use crate::ephemeris::{EphemerisProvider, EphemerisSource};
use crate::error::{AstroError, AstroResult};
use crate::models::time::parse_timezone;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "ASTROCAST_CONFIG";

/// Station configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub station: StationSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
    #[serde(default)]
    pub search: SearchSettings,
}

/// Where the station is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSettings {
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone identifier used for every local-time rendering.
    pub timezone: String,
}

/// Refresh loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

/// Ephemeris data set settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EphemerisSettings {
    /// Empty means the bundled data set.
    #[serde(default)]
    pub path: String,
}

/// Search window bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_moon_days")]
    pub moon_days: u32,
    #[serde(default = "default_lunar_window_days")]
    pub lunar_window_days: u32,
}

fn default_interval_seconds() -> u64 {
    60
}

fn default_moon_days() -> u32 {
    7
}

fn default_lunar_window_days() -> u32 {
    90
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            moon_days: default_moon_days(),
            lunar_window_days: default_lunar_window_days(),
        }
    }
}

impl FromStr for StationConfig {
    type Err = AstroError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content).map_err(|e| {
            AstroError::Configuration(format!("Failed to parse config file: {}", e))
        })
    }
}

impl StationConfig {
    /// Load station configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AstroResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AstroError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        content.parse()
    }

    /// Load station configuration from the default location.
    ///
    /// Searches for `station.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> AstroResult<Self> {
        let search_paths = [
            PathBuf::from("station.toml"),
            PathBuf::from("backend/station.toml"),
            PathBuf::from("../station.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(AstroError::Configuration(
            "No station.toml found in standard locations".to_string(),
        ))
    }

    /// Load from `ASTROCAST_CONFIG` when set, otherwise the default location.
    pub fn from_env_or_default() -> AstroResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Self::from_default_location(),
        }
    }

    /// Validated station location.
    pub fn location(&self) -> AstroResult<GeographicLocation> {
        GeographicLocation::new(self.station.latitude, self.station.longitude)
    }

    /// Station timezone.
    pub fn timezone(&self) -> AstroResult<Tz> {
        parse_timezone(&self.station.timezone)
    }

    pub fn ephemeris_source(&self) -> EphemerisSource {
        let path = self.ephemeris.path.trim();
        if path.is_empty() {
            EphemerisSource::Bundled
        } else {
            EphemerisSource::File(PathBuf::from(path))
        }
    }

    /// Provider for the configured data set; nothing is loaded yet.
    pub fn ephemeris_provider(&self) -> EphemerisProvider {
        EphemerisProvider::new(self.ephemeris_source())
    }

    /// Check every field that would otherwise fail at the first refresh.
    pub fn validate(&self) -> AstroResult<()> {
        self.location()?;
        self.timezone()?;
        if self.refresh.interval_seconds == 0 {
            return Err(AstroError::Configuration(
                "refresh.interval_seconds must be positive".to_string(),
            ));
        }
        if self.search.moon_days == 0 || self.search.lunar_window_days == 0 {
            return Err(AstroError::Configuration(
                "search windows must be at least one day".to_string(),
            ));
        }
        Ok(())
    }
}
