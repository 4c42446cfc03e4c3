// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./wanotify.toml` > `~/.config/wanotify/wanotify.toml`
//! > `/etc/wanotify/wanotify.toml` with environment variable overrides via the
//! `WANOTIFY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WanotifyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/wanotify/wanotify.toml` (system-wide)
/// 3. `~/.config/wanotify/wanotify.toml` (user XDG config)
/// 4. `./wanotify.toml` (local directory)
/// 5. `WANOTIFY_*` environment variables
pub fn load_config() -> Result<WanotifyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WanotifyConfig::default()))
        .merge(Toml::file("/etc/wanotify/wanotify.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("wanotify/wanotify.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("wanotify.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<WanotifyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WanotifyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WanotifyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WanotifyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `WANOTIFY_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("WANOTIFY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: WANOTIFY_POLLER_BATCH_SIZE -> "poller_batch_size"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("worker_", "worker.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("bridge_", "bridge.", 1)
            .replacen("poller_", "poller.", 1)
            .replacen("heartbeat_", "heartbeat.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[poller]
interval_secs = 10
"#,
        )
        .unwrap();
        assert_eq!(config.poller.interval_secs, 10);
        assert_eq!(config.poller.batch_size, 5);
    }

    #[test]
    fn env_overrides_apply_with_section_mapping() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("WANOTIFY_STORAGE_DATABASE_PATH", "/tmp/q.db");
            jail.set_env("WANOTIFY_POLLER_BATCH_SIZE", "9");
            let config = load_config().expect("config should load");
            assert_eq!(config.storage.database_path, "/tmp/q.db");
            assert_eq!(config.poller.batch_size, 9);
            Ok(())
        });
    }
}
