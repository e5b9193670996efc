use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

pub const DEFAULT_DEBOUNCE_MS: u64 = 2500;
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";
pub const DEFAULT_FORECAST_DAYS: u8 = 7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// en-GB style, e.g. "Monday 15 Jan".
pub const DEFAULT_DATE_FORMAT: &str = "%A %-d %b";

/// Top-level configuration, read from `config.toml`. Every field is optional.
///
/// Example TOML:
/// ```toml
/// debounce_ms = 500
/// forecast_days = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period after the last keystroke before a query is committed.
    pub debounce_ms: u64,

    /// Base URL of the geocoding API (`/search` is appended).
    pub geocoding_url: String,

    /// Base URL of the forecast API (`/forecast` is appended).
    pub forecast_url: String,

    /// Number of forecast days to request (1-16).
    pub forecast_days: u8,

    /// Per-request timeout for both remote calls.
    pub timeout_secs: u64,

    /// chrono format string for the card date.
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Forecast days clamped to what the API accepts.
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.clamp(1, 16)
    }

    /// Load config from the platform config directory, or return defaults if
    /// there is no file yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("Invalid configuration TOML")?;
        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
