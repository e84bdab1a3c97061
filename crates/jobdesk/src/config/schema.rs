use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::db::default_database_path;
use crate::error::ConfigError;
use crate::notify::NotificationPreferences;
use crate::persistence::{DEFAULT_LEGACY_KEYS, DEFAULT_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_version")]
    pub version: String,
    /// Prefix for every storage key.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Database file; `~/.jobdesk/data/jobdesk.db` when unset.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Backups kept after each new backup; `null` keeps all of them.
    #[serde(default = "default_backup_retention")]
    pub backup_retention: Option<usize>,
    #[serde(default = "default_legacy_keys")]
    pub legacy_keys: Vec<String>,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_backup_retention() -> Option<usize> {
    Some(10)
}

fn default_legacy_keys() -> Vec<String> {
    DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            namespace: default_namespace(),
            database_path: None,
            backup_retention: default_backup_retention(),
            legacy_keys: default_legacy_keys(),
            notifications: NotificationPreferences::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// The configured database path, or the per-user default.
    pub fn resolved_database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path().ok_or_else(|| ConfigError::Validation {
                message: "No home directory found; set database_path explicitly".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Per-target overrides, e.g. `{"jobdesk::persistence": "debug"}`.
    #[serde(default)]
    pub target_levels: HashMap<String, String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            target_levels: HashMap::new(),
        }
    }
}
