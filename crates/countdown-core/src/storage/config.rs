//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The duration a fresh countdown starts with
//! - The preset list offered by front ends
//! - How the completion cue is played
//! - Progress ring and bar dimensions
//!
//! Configuration is stored at `~/.config/countdown/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::timer::{Preset, TimerConfig};

/// Completion cue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Command to run on completion, e.g. `paplay /usr/share/sounds/bell.oga`.
    #[serde(default)]
    pub command: Option<String>,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_ring_radius")]
    pub ring_radius: f64,
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/countdown/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_seconds")]
    pub default_seconds: u64,
    #[serde(default)]
    pub cue: CueConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default = "Preset::defaults")]
    pub presets: Vec<Preset>,
}

// Default functions
fn default_seconds() -> u64 {
    300
}
fn default_true() -> bool {
    true
}
fn default_ring_radius() -> f64 {
    52.0
}
fn default_bar_width() -> u32 {
    30
}

/// Cells the terminal progress bar may span.
const BAR_WIDTH_RANGE: std::ops::RangeInclusive<u32> = 1..=200;

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
            command: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            ring_radius: default_ring_radius(),
            bar_width: default_bar_width(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_seconds: default_seconds(),
            cue: CueConfig::default(),
            ui: UiConfig::default(),
            presets: Preset::defaults(),
        }
    }
}

impl Config {
    /// Step into an object field or, for numeric segments, an array element.
    fn child<'a>(value: &'a serde_json::Value, part: &str) -> Option<&'a serde_json::Value> {
        match value {
            serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?),
            other => other.get(part),
        }
    }

    fn child_mut<'a>(
        value: &'a mut serde_json::Value,
        part: &str,
    ) -> Option<&'a mut serde_json::Value> {
        match value {
            serde_json::Value::Array(items) => items.get_mut(part.parse::<usize>().ok()?),
            other => other.get_mut(part),
        }
    }

    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = Self::child(current, part)?;
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut slot = root;
        for part in key.split('.') {
            slot = Self::child_mut(slot, part).ok_or_else(unknown)?;
        }

        let new_value = match &*slot {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("'{value}' is not true or false")))?,
            ),
            serde_json::Value::Number(n) if n.is_f64() => value
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(serde_json::Value::Number)
                .ok_or_else(|| invalid(format!("'{value}' is not a number")))?,
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("'{value}' is not a whole number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
            }
            // Strings and unset optionals take the raw text.
            _ => serde_json::Value::String(value.into()),
        };

        *slot = new_value;
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed
    /// or validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config missing, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                return Ok(cfg);
            }
            Err(e) => return Err(e.into()),
        };

        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the engine or the terminal view cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        TimerConfig::new(self.default_seconds).map_err(|e| ConfigError::InvalidValue {
            key: "default_seconds".into(),
            message: e.to_string(),
        })?;
        for (i, preset) in self.presets.iter().enumerate() {
            TimerConfig::new(preset.seconds).map_err(|e| ConfigError::InvalidValue {
                key: format!("presets.{i}.seconds"),
                message: e.to_string(),
            })?;
        }
        if !self.ui.ring_radius.is_finite() || self.ui.ring_radius <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "ui.ring_radius".into(),
                message: "must be a positive number".into(),
            });
        }
        if !BAR_WIDTH_RANGE.contains(&self.ui.bar_width) {
            return Err(ConfigError::InvalidValue {
                key: "ui.bar_width".into(),
                message: format!(
                    "must be between {} and {}",
                    BAR_WIDTH_RANGE.start(),
                    BAR_WIDTH_RANGE.end()
                ),
            });
        }
        Ok(())
    }

    /// Countdown length used when neither a duration nor a preset is given.
    pub fn timer_config(&self) -> Result<TimerConfig> {
        Ok(TimerConfig::new(self.default_seconds)?)
    }

    /// Get a config value as string by dot-separated key.
    /// Array elements are addressed by index, e.g. `presets.0.label`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Returns error if key is
    /// unknown or the result fails validation; `self` is unchanged then.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Find a preset by 1-based index or case-insensitive label.
    pub fn find_preset(&self, query: &str) -> Option<&Preset> {
        if let Ok(index) = query.trim().parse::<usize>() {
            return index.checked_sub(1).and_then(|i| self.presets.get(i));
        }
        self.presets
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(query.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.default_seconds, 300);
        assert!(cfg.cue.enabled);
        assert!(cfg.cue.bell);
        assert!(cfg.cue.command.is_none());
        assert_eq!(cfg.ui.ring_radius, 52.0);
        assert_eq!(cfg.ui.bar_width, 30);
        assert_eq!(cfg.presets.len(), 3);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("default_seconds = 90\n").unwrap();
        assert_eq!(cfg.default_seconds, 90);
        assert_eq!(cfg.presets, Preset::defaults());
        assert!(cfg.cue.bell);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("cue.bell").as_deref(), Some("true"));
        assert_eq!(cfg.get("default_seconds").as_deref(), Some("300"));
        assert_eq!(cfg.get("ui.ring_radius").as_deref(), Some("52.0"));
        assert!(cfg.get("ui.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("cue.bell", "false").unwrap();
        cfg.set("default_seconds", "600").unwrap();
        cfg.set("ui.ring_radius", "40.5").unwrap();
        cfg.set("cue.command", "paplay done.oga").unwrap();

        assert!(!cfg.cue.bell);
        assert_eq!(cfg.default_seconds, 600);
        assert_eq!(cfg.ui.ring_radius, 40.5);
        assert_eq!(cfg.cue.command.as_deref(), Some("paplay done.oga"));
    }

    #[test]
    fn set_accepts_json_for_lists() {
        let mut cfg = Config::default();
        cfg.set("presets", r#"[{"label":"Tea","seconds":180}]"#).unwrap();
        assert_eq!(cfg.presets, vec![Preset::new("Tea", 180).unwrap()]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("ui.nonexistent_key", "value"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("cue.bell", "not_a_bool").is_err());
        assert!(cfg.set("default_seconds", "1.5").is_err());
        assert!(cfg.set("default_seconds", "-3").is_err());
    }

    #[test]
    fn set_rejects_zero_duration_and_keeps_state() {
        let mut cfg = Config::default();
        let err = cfg.set("default_seconds", "0").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.default_seconds, 300);
    }

    #[test]
    fn validate_rejects_zero_preset() {
        let mut cfg = Config::default();
        cfg.presets.push(Preset {
            label: "Broken".into(),
            seconds: 0,
        });
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "presets.3.seconds"));
    }

    #[test]
    fn find_preset_by_index_or_label() {
        let cfg = Config::default();
        assert_eq!(cfg.find_preset("1").unwrap().label, "Focus");
        assert_eq!(cfg.find_preset("short break").unwrap().seconds, 300);
        assert!(cfg.find_preset("0").is_none());
        assert!(cfg.find_preset("9").is_none());
        assert!(cfg.find_preset("nope").is_none());
    }

    #[test]
    fn load_writes_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("default_seconds", "45").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_seconds, 45);
    }

    #[test]
    fn load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_seconds = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));

        std::fs::write(&path, "default_seconds = \"soon\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }

    #[test]
    fn load_reports_unreadable_path_as_io() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        assert!(matches!(
            Config::load_from(dir.path()),
            Err(CoreError::Io(_))
        ));
    }

    #[test]
    fn bar_width_is_bounded() {
        let mut cfg = Config::default();
        cfg.set("ui.bar_width", "200").unwrap();
        assert_eq!(cfg.ui.bar_width, 200);

        for bad in ["0", "201", "4294967295"] {
            let err = cfg.set("ui.bar_width", bad).unwrap_err();
            assert!(
                matches!(err, CoreError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "ui.bar_width"),
                "expected '{bad}' to be rejected, got {err}"
            );
        }
        assert_eq!(cfg.ui.bar_width, 200);
    }

    #[test]
    fn array_elements_are_addressable_by_index() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("presets.1.label").as_deref(), Some("Short Break"));
        assert_eq!(cfg.get("presets.0.seconds").as_deref(), Some("1500"));
        assert!(cfg.get("presets.9.label").is_none());
        assert!(cfg.get("presets.first.label").is_none());

        cfg.set("presets.0.seconds", "60").unwrap();
        cfg.set("presets.0.label", "Sprint").unwrap();
        assert_eq!(cfg.presets[0], Preset::new("Sprint", 60).unwrap());

        assert!(matches!(
            cfg.set("presets.7.seconds", "60"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
    }

    #[test]
    fn preset_validation_key_can_be_fed_back_to_set() {
        let mut cfg = Config::default();
        let err = cfg.set("presets.2.seconds", "0").unwrap_err();
        let key = match &err {
            CoreError::Config(ConfigError::InvalidValue { key, .. }) => key.clone(),
            other => panic!("expected InvalidValue, got {other}"),
        };
        assert_eq!(key, "presets.2.seconds");
        assert_eq!(cfg.get(&key).as_deref(), Some("900"));
        cfg.set(&key, "600").unwrap();
        assert_eq!(cfg.presets[2].seconds, 600);
    }

    #[test]
    fn timer_config_uses_default_seconds() {
        let mut cfg = Config::default();
        cfg.set("default_seconds", "90").unwrap();
        assert_eq!(cfg.timer_config().unwrap().total_seconds(), 90);
    }
}
