// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the wanotify worker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level wanotify configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to values
/// suitable for a single-worker deployment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WanotifyConfig {
    /// Process-level settings (logging, session directory).
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Queue and config-store database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// WhatsApp Web bridge sidecar settings.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Queue poller settings.
    #[serde(default)]
    pub poller: PollerConfig,

    /// Heartbeat emission settings.
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

/// Process-level worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory where the bridge persists its session. When set, stale
    /// `Singleton*` lock files under it are removed at startup.
    #[serde(default)]
    pub session_path: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            session_path: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding `whatsapp_queue` and
    /// `system_config`.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "wanotify.db".to_string()
}

/// WhatsApp Web bridge sidecar configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Base URL of the bridge's HTTP API.
    #[serde(default = "default_bridge_url")]
    pub base_url: String,

    /// How long the bridge may hold an `/events` long-poll open, in seconds.
    #[serde(default = "default_event_wait_secs")]
    pub event_wait_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            event_wait_secs: default_event_wait_secs(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8477".to_string()
}

fn default_event_wait_secs() -> u64 {
    25
}

/// Queue poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollerConfig {
    /// Poll interval in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of pending rows fetched per cycle.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    2
}

fn default_batch_size() -> u32 {
    5
}

/// Heartbeat emission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HeartbeatConfig {
    /// Emission interval in seconds. The first emission is immediate.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub interval_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

fn default_heartbeat_interval_secs() -> u64 {
    30
}
