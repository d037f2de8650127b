//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The active catalog (built-in pack or custom TOML file)
//! - Where the ledger state is kept
//! - Log filtering and status display
//!
//! Configuration is stored at `~/.config/rewardledger/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::catalog::{find_pack, pack_ids, Catalog};
use crate::error::{ConfigError, CoreError};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Status display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Print the task and reward lists under `status`.
    #[serde(default)]
    pub show_catalog_in_status: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/rewardledger/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Built-in pack ID.
    #[serde(default = "default_pack")]
    pub pack: String,
    /// Custom catalog file; takes precedence over `pack`.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Ledger state file; defaults to `<data_dir>/<catalog>_state.json`.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_pack() -> String {
    "exercise".into()
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_catalog_in_status: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pack: default_pack(),
            catalog_path: None,
            state_file: None,
            log: LogConfig::default(),
            display: DisplayConfig::default(),
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
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot assign a section".into()));
                    }
                    // Optional paths: an empty value or "none" unsets them.
                    serde_json::Value::Null | serde_json::Value::String(_)
                        if value.is_empty() || value == "none" =>
                    {
                        serde_json::Value::Null
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

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Ok(Self::load_from(&Self::path()?)?)
    }

    /// Load from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default config");
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
    pub fn save(&self) -> Result<(), CoreError> {
        Ok(self.save_to(&Self::path()?)?)
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

    /// Set a config value by key in memory. Returns error if key is unknown
    /// or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Reject settings that cannot be resolved to a catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog_path.is_none() && find_pack(&self.pack).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "pack".into(),
                message: format!(
                    "unknown pack '{}', expected one of: {}",
                    self.pack,
                    pack_ids().join(", ")
                ),
            });
        }
        Ok(())
    }

    /// The catalog this configuration selects.
    pub fn catalog(&self) -> Result<Catalog, CoreError> {
        if let Some(path) = &self.catalog_path {
            return Ok(Catalog::load(path)?);
        }
        find_pack(&self.pack)
            .map(|p| p.catalog)
            .ok_or_else(|| ConfigError::UnknownPack(self.pack.clone()).into())
    }

    /// Where the ledger state for `catalog` is kept.
    pub fn state_path(&self, catalog: &Catalog) -> Result<PathBuf, CoreError> {
        if let Some(path) = &self.state_file {
            return Ok(path.clone());
        }
        Ok(data_dir()?.join(format!("{}_state.json", catalog.name())))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
