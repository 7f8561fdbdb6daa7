//! Runtime configuration for the SafeSpace companion.
//!
//! Every field carries a serde default so that an empty or partial TOML file
//! still yields a usable configuration; environment overrides are applied on
//! top of whatever was loaded.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::types::Location;

/// Auto-deactivation threshold for panic mode (30 minutes).
pub const DEFAULT_PANIC_TIMEOUT_MS: u64 = 1_800_000;
/// Strobe light lifetime.
pub const DEFAULT_STROBE_DURATION_MS: u64 = 60_000;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[cfg(feature = "toml")]
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalConfig {
    #[serde(default = "default_wearable_interval")]
    pub wearable_interval_secs: u64,
    #[serde(default = "default_score_interval")]
    pub score_interval_secs: u64,
    #[serde(default = "default_timeout_check_interval")]
    pub timeout_check_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyConfig {
    #[serde(default = "default_panic_timeout")]
    pub panic_timeout_ms: u64,
    #[serde(default = "default_strobe_duration")]
    pub strobe_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub intervals: IntervalConfig,
    #[serde(default)]
    pub emergency: EmergencyConfig,
    #[serde(default = "default_profile_timeout")]
    pub profile_timeout_ms: u64,
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
    /// Fixed seed for the simulated sensors; random when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
    #[serde(default)]
    pub json_logs: bool,
    #[serde(default)]
    pub location: Location,
}

fn default_wearable_interval() -> u64 {
    15
}

fn default_score_interval() -> u64 {
    30
}

fn default_timeout_check_interval() -> u64 {
    5
}

fn default_panic_timeout() -> u64 {
    DEFAULT_PANIC_TIMEOUT_MS
}

fn default_strobe_duration() -> u64 {
    DEFAULT_STROBE_DURATION_MS
}

fn default_profile_timeout() -> u64 {
    5_000
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("safespace-settings.json")
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            wearable_interval_secs: default_wearable_interval(),
            score_interval_secs: default_score_interval(),
            timeout_check_interval_secs: default_timeout_check_interval(),
        }
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            panic_timeout_ms: default_panic_timeout(),
            strobe_duration_ms: default_strobe_duration(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            intervals: IntervalConfig::default(),
            emergency: EmergencyConfig::default(),
            profile_timeout_ms: default_profile_timeout(),
            settings_path: default_settings_path(),
            rng_seed: None,
            json_logs: false,
            location: Location::default(),
        }
    }
}

impl IntervalConfig {
    pub fn wearable(&self) -> Duration {
        Duration::from_secs(self.wearable_interval_secs)
    }

    pub fn score(&self) -> Duration {
        Duration::from_secs(self.score_interval_secs)
    }

    pub fn timeout_check(&self) -> Duration {
        Duration::from_secs(self.timeout_check_interval_secs)
    }
}

impl RuntimeConfig {
    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` when given, otherwise start from defaults; then apply
    /// environment overrides.
    #[cfg(feature = "toml")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn profile_timeout(&self) -> Duration {
        Duration::from_millis(self.profile_timeout_ms)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(seed) = std::env::var("SAFESPACE_RNG_SEED") {
            if let Ok(parsed) = seed.parse::<u64>() {
                self.rng_seed = Some(parsed);
            }
        }

        if let Ok(path) = std::env::var("SAFESPACE_SETTINGS_PATH") {
            if !path.trim().is_empty() {
                self.settings_path = PathBuf::from(path);
            }
        }

        if let Ok(json) = std::env::var("SAFESPACE_JSON_LOGS") {
            let lowered = json.to_ascii_lowercase();
            self.json_logs = matches!(lowered.as_str(), "1" | "true" | "yes" | "on");
        }

        if let Ok(timeout) = std::env::var("SAFESPACE_PANIC_TIMEOUT_MS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.emergency.panic_timeout_ms = parsed;
            }
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("wearable_interval_secs", self.intervals.wearable_interval_secs),
            ("score_interval_secs", self.intervals.score_interval_secs),
            (
                "timeout_check_interval_secs",
                self.intervals.timeout_check_interval_secs,
            ),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.emergency.strobe_duration_ms == 0 {
            return Err(ConfigError::ValidationError(
                "strobe_duration_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
