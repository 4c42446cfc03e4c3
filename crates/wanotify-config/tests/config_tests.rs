// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the wanotify configuration system.

use wanotify_config::diagnostic::ConfigError;
use wanotify_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_wanotify_config() {
    let toml = r#"
[worker]
log_level = "debug"
session_path = "/app/session"

[storage]
database_path = "/var/lib/wanotify/queue.db"

[bridge]
base_url = "http://bridge:8477"
event_wait_secs = 10

[poller]
interval_secs = 3
batch_size = 8

[heartbeat]
interval_secs = 15
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.worker.log_level, "debug");
    assert_eq!(config.worker.session_path.as_deref(), Some("/app/session"));
    assert_eq!(config.storage.database_path, "/var/lib/wanotify/queue.db");
    assert_eq!(config.bridge.base_url, "http://bridge:8477");
    assert_eq!(config.bridge.event_wait_secs, 10);
    assert_eq!(config.poller.interval_secs, 3);
    assert_eq!(config.poller.batch_size, 8);
    assert_eq!(config.heartbeat.interval_secs, 15);
}

/// Missing sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.worker.log_level, "info");
    assert_eq!(config.storage.database_path, "wanotify.db");
    assert_eq!(config.bridge.base_url, "http://127.0.0.1:8477");
    assert_eq!(config.poller.interval_secs, 2);
    assert_eq!(config.poller.batch_size, 5);
    assert_eq!(config.heartbeat.interval_secs, 30);
}

/// Unknown field produces an error mentioning the bad key.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[bridge]
base_uri = "http://bridge:8477"
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("base_uri"),
        "error should mention the unknown field, got: {err_str}"
    );
}

/// load_and_validate_str surfaces both figment and semantic errors as diagnostics.
#[test]
fn load_and_validate_reports_semantic_errors() {
    let errors = load_and_validate_str(
        r#"
[poller]
interval_secs = 0
"#,
    )
    .expect_err("zero interval should fail validation");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("interval_secs"))));
}

/// A typo'd key yields an UnknownKey diagnostic with a suggestion.
#[test]
fn typo_key_gets_suggestion() {
    let errors = load_and_validate_str(
        r#"
[storage]
databse_path = "/tmp/q.db"
"#,
    )
    .expect_err("typo key should be rejected");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion, .. }
            if key == "databse_path" && suggestion.as_deref() == Some("database_path")
    )));
}

/// Wrong value type is reported as an invalid-type diagnostic.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str(
        r#"
[poller]
batch_size = "five"
"#,
    )
    .expect_err("string batch_size should be rejected");
    assert!(!errors.is_empty());
}
