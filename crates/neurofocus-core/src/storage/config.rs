//! TOML-based host configuration.
//!
//! Holds the controller policies that are a matter of taste rather than
//! user settings:
//! - whether breaks can be paused
//! - whether the next segment starts on its own
//! - how long session logs are kept
//! - how many distracting sites may be listed
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::ControllerPolicy;

/// Controller policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub breaks_pausable: bool,
    #[serde(default)]
    pub auto_start_next: bool,
    /// Days of session log to keep; 0 keeps everything.
    #[serde(default = "default_retention_days")]
    pub log_retention_days: u32,
    #[serde(default = "default_max_sites")]
    pub max_distracting_sites: usize,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Host configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_true() -> bool {
    true
}
fn default_retention_days() -> u32 {
    90
}
fn default_max_sites() -> usize {
    20
}

const MAX_SITES_CAP: usize = 500;
const MAX_RETENTION_DAYS: u32 = 3650;

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            breaks_pausable: true,
            auto_start_next: false,
            log_retention_days: default_retention_days(),
            max_distracting_sites: default_max_sites(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
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
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
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
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) => {
                    return Err(invalid("is a table, set one of its keys instead".into()))
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Location of `config.toml` inside the data directory.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
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
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
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

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Set a config value by key without touching the disk.
    ///
    /// The whole config is validated after the change; on error `self` is
    /// left untouched.
    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Put one key back to its default value and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the config cannot be saved.
    pub fn reset_key(&mut self, key: &str) -> Result<(), ConfigError> {
        let default = Self::default()
            .get(key)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: key.to_string(),
                message: "unknown config key".into(),
            })?;
        self.set(key, &default)
    }

    /// Reject values the controller cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sites = self.policy.max_distracting_sites;
        if !(1..=MAX_SITES_CAP).contains(&sites) {
            return Err(ConfigError::InvalidValue {
                key: "policy.max_distracting_sites".into(),
                message: format!("must be between 1 and {MAX_SITES_CAP}, got {sites}"),
            });
        }
        if self.policy.log_retention_days > MAX_RETENTION_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "policy.log_retention_days".into(),
                message: format!(
                    "must be at most {MAX_RETENTION_DAYS} (0 keeps everything), got {}",
                    self.policy.log_retention_days
                ),
            });
        }
        Ok(())
    }

    /// Every leaf value as `(dot.path, value)`, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out.sort();
        out
    }

    /// Policy handed to the session controller.
    pub fn controller_policy(&self) -> ControllerPolicy {
        ControllerPolicy {
            breaks_pausable: self.policy.breaks_pausable,
            auto_start_next: self.policy.auto_start_next,
            log_retention_days: match self.policy.log_retention_days {
                0 => None,
                days => Some(days),
            },
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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
        assert!(parsed.policy.breaks_pausable);
        assert_eq!(parsed.policy.log_retention_days, 90);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[policy]\nauto_start_next = true\n").unwrap();
        assert!(parsed.policy.auto_start_next);
        assert!(parsed.policy.breaks_pausable);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("policy.breaks_pausable").as_deref(), Some("true"));
        assert_eq!(cfg.get("policy.max_distracting_sites").as_deref(), Some("20"));
        assert!(cfg.get("policy.missing_key").is_none());
    }

    #[test]
    fn apply_updates_bool_and_number() {
        let mut cfg = Config::default();
        cfg.apply("policy.auto_start_next", "true").unwrap();
        cfg.apply("policy.log_retention_days", "10").unwrap();
        assert!(cfg.policy.auto_start_next);
        assert_eq!(cfg.policy.log_retention_days, 10);
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(cfg.apply("policy.nonexistent", "1").is_err());
        assert!(cfg.apply("policy.breaks_pausable", "maybe").is_err());
        assert!(cfg.apply("", "1").is_err());
        assert!(cfg.apply("policy", "true").is_err());
        assert!(cfg.policy.breaks_pausable);
    }

    #[test]
    fn apply_rejects_out_of_range_policy_values() {
        let mut cfg = Config::default();
        let err = cfg.apply("policy.max_distracting_sites", "0").unwrap_err();
        assert!(err.to_string().contains("policy.max_distracting_sites"));
        assert_eq!(cfg.policy.max_distracting_sites, 20);
        assert!(cfg.apply("policy.log_retention_days", "100000").is_err());
        assert_eq!(cfg.policy.log_retention_days, 90);
    }

    #[test]
    fn entries_list_every_leaf_key() {
        let keys: Vec<String> = Config::default().entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "notifications.enabled",
                "policy.auto_start_next",
                "policy.breaks_pausable",
                "policy.log_retention_days",
                "policy.max_distracting_sites",
            ]
        );
    }

    #[test]
    fn tick_rate_is_not_configurable() {
        let parsed: Config =
            toml::from_str("[runtime]\ntick_interval_ms = 250\n\n[policy]\nauto_start_next = true\n")
                .unwrap();
        assert!(parsed.policy.auto_start_next);
        assert!(parsed.get("runtime.tick_interval_ms").is_none());
        let mut cfg = parsed;
        assert!(cfg.apply("runtime.tick_interval_ms", "250").is_err());
    }

    #[test]
    fn zero_retention_means_unbounded() {
        let mut cfg = Config::default();
        cfg.policy.log_retention_days = 0;
        assert_eq!(cfg.controller_policy().log_retention_days, None);
        cfg.policy.log_retention_days = 10;
        assert_eq!(cfg.controller_policy().log_retention_days, Some(10));
    }
}
