// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared domain types: queue status, roster entries, and the keys the
//! worker owns in the shared `system_config` store.

use serde::{Deserialize, Serialize};

/// Config-store key holding the current pairing payload while a scan is pending.
pub const QR_CODE_KEY: &str = "whatsappQRCode";

/// Config-store key holding the `{ts, state}` heartbeat payload.
pub const HEARTBEAT_KEY: &str = "whatsappHeartbeat";

/// Sentinel key an operator writes to request a session logout. The worker
/// polls for it, acts on it, and deletes it.
pub const LOGOUT_REQUEST_KEY: &str = "whatsappLogoutRequest";

/// Lifecycle status of a notification row.
///
/// Rows are created externally as `Pending` and transition exactly once to
/// `Sent` or `Failed`. A terminal status is never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueStatus {
    Pending,
    Sent,
    Failed,
}

impl QueueStatus {
    /// The uppercase form stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            QueueStatus::Pending => "PENDING",
            QueueStatus::Sent => "SENT",
            QueueStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(QueueStatus::Pending),
            "SENT" => Ok(QueueStatus::Sent),
            "FAILED" => Ok(QueueStatus::Failed),
            other => Err(format!("unknown queue status `{other}`")),
        }
    }
}

/// One conversation visible to the authenticated session.
///
/// `id` is the already-qualified chat identifier (`...@c.us` or `...@g.us`);
/// `name` is the display name used for roster lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub name: String,
}

/// Lifecycle events reported by the messaging client.
///
/// Events arrive on the single-threaded scheduler over an mpsc channel;
/// each handler runs to completion before the next event is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// A pairing code was issued; the session is awaiting a scan.
    PairingCode(String),
    /// The session authenticated and the connection is usable.
    Ready,
    /// The connection dropped. The session is not usable until re-paired
    /// or reinitialized.
    Disconnected(String),
    /// Authentication was rejected by the network.
    AuthFailure(String),
}
