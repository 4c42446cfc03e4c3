// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the wanotify worker.

use thiserror::Error;

/// The primary error type used across the wanotify crates.
#[derive(Debug, Error)]
pub enum WanotifyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging client errors (bridge unreachable, send rejected, bad response).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WanotifyError {
    /// Build a channel error from a message alone (no underlying cause).
    pub fn channel(message: impl Into<String>) -> Self {
        WanotifyError::Channel {
            message: message.into(),
            source: None,
        }
    }
}
