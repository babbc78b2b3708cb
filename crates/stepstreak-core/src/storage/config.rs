//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The daily activity goal
//! - Bonus-day defaults used when the ledger is first created
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::streak::{Reconciler, DEFAULT_EARN_EVERY_N, DEFAULT_MAX_BALANCE};

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: [&str; 3] = ["goal.daily_target", "bonus.max_balance", "bonus.earn_every_n"];

/// Lowest daily goal the settings accept.
pub const MIN_DAILY_TARGET: u32 = 1_000;
/// Highest daily goal the settings accept.
pub const MAX_DAILY_TARGET: u32 = 40_000;
/// Upper bound for both bonus settings.
pub const MAX_BONUS_SETTING: u32 = 30;

/// Daily goal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_target")]
    pub daily_target: u32,
}

/// Bonus-day configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusConfig {
    #[serde(default = "default_max_balance")]
    pub max_balance: u32,
    /// Consecutive credited days per earned bonus day; 0 disables earning.
    #[serde(default = "default_earn_every_n")]
    pub earn_every_n: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub bonus: BonusConfig,
}

fn default_daily_target() -> u32 {
    10_000
}
fn default_max_balance() -> u32 {
    DEFAULT_MAX_BALANCE
}
fn default_earn_every_n() -> u32 {
    DEFAULT_EARN_EVERY_N
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_target: default_daily_target(),
        }
    }
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            max_balance: default_max_balance(),
            earn_every_n: default_earn_every_n(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            goal: GoalConfig::default(),
            bonus: BonusConfig::default(),
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
        if key.is_empty() {
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
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Path of the config file in the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there when it is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
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

    /// Persist to disk.
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
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check every value against the ranges the settings allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DAILY_TARGET..=MAX_DAILY_TARGET).contains(&self.goal.daily_target) {
            return Err(ConfigError::InvalidValue {
                key: "goal.daily_target".into(),
                message: format!(
                    "must be between {MIN_DAILY_TARGET} and {MAX_DAILY_TARGET}, got {}",
                    self.goal.daily_target
                ),
            });
        }
        if self.bonus.max_balance > MAX_BONUS_SETTING {
            return Err(ConfigError::InvalidValue {
                key: "bonus.max_balance".into(),
                message: format!("must be at most {MAX_BONUS_SETTING}"),
            });
        }
        if self.bonus.earn_every_n > MAX_BONUS_SETTING {
            return Err(ConfigError::InvalidValue {
                key: "bonus.earn_every_n".into(),
                message: format!("must be at most {MAX_BONUS_SETTING}"),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory. The result must pass [`Config::validate`].
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
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

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// or is out of range, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Reconciler for the configured goal and bonus defaults.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.goal.daily_target)
            .with_bonus_defaults(self.bonus.max_balance, self.bonus.earn_every_n)
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
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.goal.daily_target, 10_000);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.goal.daily_target, 10_000);
        assert_eq!(cfg.bonus.max_balance, 3);
        assert_eq!(cfg.bonus.earn_every_n, 7);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: Config = toml::from_str("[goal]\ndaily_target = 8000\n").unwrap();
        assert_eq!(cfg.goal.daily_target, 8000);
        assert_eq!(cfg.bonus, BonusConfig::default());
    }

    #[test]
    fn every_listed_key_resolves() {
        let cfg = Config::default();
        for key in CONFIG_KEYS {
            assert!(cfg.get(key).is_some(), "{key} has no value");
        }
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("goal.daily_target").as_deref(), Some("10000"));
        assert_eq!(cfg.get("bonus.earn_every_n").as_deref(), Some("7"));
        assert!(cfg.get("bonus.missing_key").is_none());
        assert!(cfg.get("bonus").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set_value("goal.daily_target", "12500").unwrap();
        assert_eq!(cfg.goal.daily_target, 12_500);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set_value("goal.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
        assert!(cfg.set_value("goal", "1").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        let err = cfg.set_value("bonus.max_balance", "lots").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.bonus.max_balance, 3);
    }

    #[test]
    fn set_value_rejects_out_of_range_goal() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("goal.daily_target", "0").is_err());
        assert!(cfg.set_value("goal.daily_target", "50000").is_err());
        assert_eq!(cfg.goal.daily_target, 10_000);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reads_saved_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_value("bonus.earn_every_n", "5").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.bonus.earn_every_n, 5);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "goal = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn reconciler_uses_configured_goal() {
        let mut cfg = Config::default();
        cfg.set_value("goal.daily_target", "8000").unwrap();
        assert_eq!(cfg.reconciler().goal_target(), 8000);
    }
}
