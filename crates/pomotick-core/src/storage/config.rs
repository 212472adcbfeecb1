//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default duration for each mode
//! - Completion cue preferences
//! - Terminal title and progress bar appearance
//!
//! Configuration is stored at `<data dir>/config.toml`. Timer state itself
//! is never persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{Mode, ModeDurations, TimerPresenter, DEFAULT_TITLE_SUFFIX};

/// Default durations, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_pomodoro")]
    pub pomodoro_min: u32,
    #[serde(default = "default_short_break")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break")]
    pub long_break_min: u32,
    #[serde(default)]
    pub default_mode: Mode,
}

/// Completion cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bell_count")]
    pub bell_count: u32,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
    #[serde(default = "default_true")]
    pub set_terminal_title: bool,
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_pomodoro() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    20
}
fn default_true() -> bool {
    true
}
fn default_bell_count() -> u32 {
    1
}
fn default_title_suffix() -> String {
    DEFAULT_TITLE_SUFFIX.into()
}
fn default_bar_width() -> u32 {
    30
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pomodoro_min: default_pomodoro(),
            short_break_min: default_short_break(),
            long_break_min: default_long_break(),
            default_mode: Mode::default(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell_count: default_bell_count(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title_suffix: default_title_suffix(),
            set_terminal_title: true,
            bar_width: default_bar_width(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn mode_durations(&self) -> ModeDurations {
        ModeDurations::from_minutes(
            self.timer.pomodoro_min as u64,
            self.timer.short_break_min as u64,
            self.timer.long_break_min as u64,
        )
    }

    /// A fresh presenter for `mode` (or the configured default mode).
    pub fn presenter(&self, mode: Option<Mode>) -> TimerPresenter {
        TimerPresenter::new(mode.unwrap_or(self.timer.default_mode), self.mode_durations())
            .with_title_suffix(self.ui.title_suffix.clone())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.long_break_min, 20);
        assert_eq!(parsed.timer.default_mode, Mode::Pomodoro);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nlong_break_min = 10\n").unwrap();
        assert_eq!(parsed.timer.long_break_min, 10);
        assert_eq!(parsed.timer.pomodoro_min, 25);
        assert_eq!(parsed.ui.title_suffix, "Pomodoro");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.pomodoro_min").as_deref(), Some("25"));
        assert_eq!(cfg.get("timer.default_mode").as_deref(), Some("pomodoro"));
        assert_eq!(cfg.get("ui.set_terminal_title").as_deref(), Some("true"));
        assert!(cfg.get("ui.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("timer.long_break_min", "10").unwrap();
        cfg.set("notifications.enabled", "false").unwrap();
        cfg.set("timer.default_mode", "short_break").unwrap();
        cfg.set("ui.title_suffix", "Focus").unwrap();
        assert_eq!(cfg.timer.long_break_min, 10);
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.timer.default_mode, Mode::ShortBreak);
        assert_eq!(cfg.ui.title_suffix, "Focus");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("ui.nonexistent_key", "value"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("", "value"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("notifications.enabled", "maybe").is_err());
        assert!(cfg.set("timer.pomodoro_min", "-4").is_err());
        assert!(cfg.set("timer.default_mode", "nap").is_err());
        assert_eq!(cfg.timer.pomodoro_min, 25);
    }

    #[test]
    fn mode_durations_follow_config() {
        let mut cfg = Config::default();
        cfg.timer.long_break_min = 10;
        let presenter = cfg.presenter(Some(Mode::LongBreak));
        assert_eq!(presenter.duration().total_secs(), 600);
        assert_eq!(cfg.presenter(None).mode(), Mode::Pomodoro);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.pomodoro_min, 25);
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("ui.bar_width", "12").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ui.bar_width, 12);
    }

    #[test]
    fn load_from_rejects_broken_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::LoadFailed { .. })));
    }
}
