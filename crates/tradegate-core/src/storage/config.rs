//! TOML-based application configuration.
//!
//! Stores the static setup the checklist and clock run against:
//! - Ordered task labels and rotated rule headings
//! - The reference timezone name
//! - The three session windows
//!
//! Configuration is stored at `~/.config/tradegate/config.toml`. It is
//! fixed for the process lifetime; the checklist surface never edits
//! it at runtime.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::checklist::TradingPlan;
use crate::error::ConfigError;
use crate::sessions::SessionSchedule;

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tradegate/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA name of the single reference timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Task labels and rule headings.
    #[serde(default)]
    pub plan: TradingPlan,
    /// Session windows, hours of day in the reference zone.
    #[serde(default)]
    pub sessions: SessionSchedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            plan: TradingPlan::default(),
            sessions: SessionSchedule::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be
    /// parsed, fails validation, or if the default config cannot be
    /// written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| {
                    ConfigError::LoadFailed {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Validate ranges the types cannot express.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty task list or a session hour
    /// outside `[0, 24)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plan.tasks.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "plan.tasks".into(),
                message: "task list must not be empty".into(),
            });
        }
        for (key, window) in [
            ("sessions.asia", self.sessions.asia),
            ("sessions.london", self.sessions.london),
            ("sessions.newyork", self.sessions.newyork),
        ] {
            for hour in [window.start_hour, window.end_hour] {
                if !(0.0..24.0).contains(&hour) {
                    return Err(ConfigError::InvalidValue {
                        key: key.into(),
                        message: format!("hour {hour} outside [0, 24)"),
                    });
                }
            }
        }
        Ok(())
    }
}
