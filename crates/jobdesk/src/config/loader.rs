use std::path::{Path, PathBuf};

use crate::config::schema::StoreConfig;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

pub const ENV_NAMESPACE: &str = "JOBDESK_NAMESPACE";
pub const ENV_DATABASE_PATH: &str = "JOBDESK_DATABASE_PATH";
pub const ENV_LOG_LEVEL: &str = "JOBDESK_LOG_LEVEL";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StoreConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<StoreConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: StoreConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Applies `JOBDESK_*` environment variables on top of `config`.
pub fn apply_env_overrides(config: &mut StoreConfig) -> Result<(), ConfigError> {
    if let Some(namespace) = env_value(ENV_NAMESPACE) {
        config.namespace = namespace;
    }
    if let Some(path) = env_value(ENV_DATABASE_PATH) {
        config.database_path = Some(PathBuf::from(path));
    }
    if let Some(level) = env_value(ENV_LOG_LEVEL) {
        config.logging.level = level.to_lowercase();
    }

    validate_config(config)
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.namespace.is_empty()
        || !config
            .namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ConfigError::Validation {
            message: format!(
                "Namespace '{}' may only contain letters, digits and '_'",
                config.namespace
            ),
        });
    }

    if config.backup_retention == Some(0) {
        return Err(ConfigError::Validation {
            message: "backup_retention must be at least 1".to_string(),
        });
    }

    let levels = std::iter::once(("default", &config.logging.level))
        .chain(config.logging.target_levels.iter().map(|(t, l)| (t.as_str(), l)));
    for (target, level) in levels {
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation {
                message: format!("Unknown log level '{}' for {}", level, target),
            });
        }
    }

    Ok(())
}
