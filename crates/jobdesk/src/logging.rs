//! Logging setup, powered by tracing-subscriber.
//!
//! The library logs through the `log` macros; `tracing_log::LogTracer`
//! forwards those records into the tracing subscriber installed here.

use std::collections::HashMap;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ConfigError;

/// Builds the filter from the base level plus per-target overrides.
/// `RUST_LOG`, when set, replaces both.
fn build_env_filter(
    level: &str,
    target_levels: &HashMap<String, String>,
) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];

    // rusqlite logs every statement at trace
    directives.push("rusqlite=warn".to_string());

    let mut targets: Vec<_> = target_levels.iter().collect();
    targets.sort();
    for (target, lvl) in targets {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str).map_err(|e| ConfigError::Logging {
        message: format!("Invalid tracing filter '{}': {}", filter_str, e),
    })
}

/// Installs the global subscriber and the `log` bridge.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = build_env_filter(&config.level, &config.target_levels)?;

    let layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::set_global_default(subscriber).map_err(|e| ConfigError::Logging {
        message: format!("A global subscriber is already installed: {}", e),
    })?;

    tracing_log::LogTracer::init().map_err(|e| ConfigError::Logging {
        message: format!("Failed to bridge log records: {}", e),
    })?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_target_overrides() {
        let mut targets = HashMap::new();
        targets.insert("jobdesk::persistence".to_string(), "trace".to_string());
        assert!(build_env_filter("info", &targets).is_ok());
    }

    #[test]
    fn test_second_init_is_an_error() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(ConfigError::Logging { .. })
        ));
    }
}
