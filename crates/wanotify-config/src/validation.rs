// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::WanotifyConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WanotifyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.worker.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "worker.log_level `{}` is not one of: {}",
                config.worker.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let bridge_url = config.bridge.base_url.trim();
    if !bridge_url.starts_with("http://") && !bridge_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("bridge.base_url `{bridge_url}` must start with http:// or https://"),
        });
    }

    if config.poller.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "poller.interval_secs must be at least 1".to_string(),
        });
    }

    if config.poller.batch_size == 0 {
        errors.push(ConfigError::Validation {
            message: "poller.batch_size must be at least 1".to_string(),
        });
    }

    if config.heartbeat.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "heartbeat.interval_secs must be at least 1".to_string(),
        });
    }

    if let Some(ref path) = config.worker.session_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "worker.session_path must not be empty when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = WanotifyConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = WanotifyConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn zero_batch_size_fails_validation() {
        let mut config = WanotifyConfig::default();
        config.poller.batch_size = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("batch_size"))));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = WanotifyConfig::default();
        config.worker.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn non_http_bridge_url_fails_validation() {
        let mut config = WanotifyConfig::default();
        config.bridge.base_url = "ws://localhost:9000".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("base_url"))));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = WanotifyConfig::default();
        config.poller.interval_secs = 0;
        config.heartbeat.interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
