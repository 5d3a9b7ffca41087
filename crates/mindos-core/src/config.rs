//! TOML-based application configuration.
//!
//! Stores the phase durations used to build a fresh engine. Configuration
//! is stored at `~/.config/mindos/config.toml`; set `MINDOS_ENV=dev` to use
//! `~/.config/mindos-dev/` instead, or `MINDOS_CONFIG_DIR` to pin an exact
//! directory (used by the CLI tests).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::timer::Durations;

/// Timer-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_min")]
    pub focus_min: u64,
    #[serde(default = "default_break_min")]
    pub break_min: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mindos/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
}

fn default_focus_min() -> u64 {
    25
}
fn default_break_min() -> u64 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_min: default_focus_min(),
            break_min: default_break_min(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        match config_path() {
            Ok(path) => Self::load_from(&path).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config = toml::from_str(&text).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Phase durations for a fresh engine.
    pub fn durations(&self) -> Durations {
        Durations {
            focus_min: self.timer.focus_min,
            break_min: self.timer.break_min,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "timer.focus_min" => Some(self.timer.focus_min.to_string()),
            "timer.break_min" => Some(self.timer.break_min.to_string()),
            _ => None,
        }
    }

    /// Set a dotted-path key and persist. Durations must be whole positive
    /// minutes.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let minutes: u64 = value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as minutes"),
        })?;
        if minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "duration must be at least 1 minute".to_string(),
            });
        }
        match key {
            "timer.focus_min" => self.timer.focus_min = minutes,
            "timer.break_min" => self.timer.break_min = minutes,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        self.save()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, minutes) in [
            ("timer.focus_min", self.timer.focus_min),
            ("timer.break_min", self.timer.break_min),
        ] {
            if minutes == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "duration must be at least 1 minute".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Returns `~/.config/mindos[-dev]/` based on MINDOS_ENV, creating it if
/// needed. MINDOS_CONFIG_DIR overrides the location entirely.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = if let Ok(dir) = std::env::var("MINDOS_CONFIG_DIR") {
        PathBuf::from(dir)
    } else {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config");
        let env = std::env::var("MINDOS_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("mindos-dev")
        } else {
            base_dir.join("mindos")
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_nominal_phase_lengths() {
        let config = Config::default();
        assert_eq!(config.timer.focus_min, 25);
        assert_eq!(config.timer.break_min, 5);
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("config.toml"));
        assert!(matches!(err, Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.timer.focus_min = 50;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.focus_min, 50);
        assert_eq!(loaded.timer.break_min, 5);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nfocus_min = 45\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.focus_min, 45);
        assert_eq!(loaded.timer.break_min, 5);
    }

    #[test]
    fn zero_duration_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nfocus_min = 0\n").unwrap();

        let err = Config::load_from(&path);
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("timer.focus_min").as_deref(), Some("25"));
        assert_eq!(config.get("timer.break_min").as_deref(), Some("5"));
        assert_eq!(config.get("timer.nope"), None);
    }
}
