// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heartbeat emission for the admin dashboard.
//!
//! On a fixed interval (first emission immediate) the emitter computes a
//! normalized link state and overwrites the `whatsappHeartbeat` config key
//! with a `{ts, state}` JSON payload. Store failures are logged and never
//! stop the timer.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wanotify_core::{MessagingClient, HEARTBEAT_KEY};
use wanotify_storage::queries::config_store;
use wanotify_storage::Database;

use crate::session::SessionSnapshot;

/// Normalized connection state reported in the heartbeat payload.
///
/// Connector versions disagree on their "connected" label; the known
/// synonym set collapses to [`Connected`](LinkState::Connected). Anything
/// unrecognized is carried verbatim as [`Unknown`](LinkState::Unknown)
/// rather than silently defaulted, so ambiguity stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Unpaired,
    Initializing,
    Disconnected,
    Error,
    Unknown(String),
}

impl LinkState {
    /// Normalize a raw connector-reported state string.
    pub fn from_connector(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CONNECTED" | "PAIRED" | "AUTHENTICATED" | "READY" => LinkState::Connected,
            "UNPAIRED" => LinkState::Unpaired,
            "INITIALIZING" => LinkState::Initializing,
            "DISCONNECTED" => LinkState::Disconnected,
            "ERROR" => LinkState::Error,
            _ => LinkState::Unknown(raw.trim().to_string()),
        }
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::Connected => write!(f, "CONNECTED"),
            LinkState::Unpaired => write!(f, "UNPAIRED"),
            LinkState::Initializing => write!(f, "INITIALIZING"),
            LinkState::Disconnected => write!(f, "DISCONNECTED"),
            LinkState::Error => write!(f, "ERROR"),
            LinkState::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// Writes the periodic heartbeat to the shared config store.
pub struct HeartbeatEmitter {
    client: Arc<dyn MessagingClient>,
    db: Database,
    state_rx: watch::Receiver<SessionSnapshot>,
    interval: Duration,
}

impl HeartbeatEmitter {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        db: Database,
        state_rx: watch::Receiver<SessionSnapshot>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            db,
            state_rx,
            interval,
        }
    }

    /// Emit heartbeats until cancelled. The first tick fires immediately.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("heartbeat emitter stopped");
                    break;
                }
                _ = ticker.tick() => self.emit_once().await,
            }
        }
    }

    /// Compute the current link state and overwrite the heartbeat key.
    pub async fn emit_once(&self) {
        let state = self.compute_state().await;
        let payload = json!({
            "ts": chrono::Utc::now().to_rfc3339(),
            "state": state.to_string(),
        });

        match config_store::put(&self.db, HEARTBEAT_KEY, payload).await {
            Ok(()) => debug!(state = %state, "heartbeat written"),
            Err(e) => warn!(error = %e, "heartbeat write failed"),
        }
    }

    async fn compute_state(&self) -> LinkState {
        let snapshot = self.state_rx.borrow().clone();
        if snapshot.ready {
            match self.client.get_state().await {
                Ok(raw) => LinkState::from_connector(&raw),
                Err(e) => {
                    // The session manager is authoritative while ready; a
                    // failed state query does not demote the heartbeat.
                    debug!(error = %e, "state query failed while ready");
                    LinkState::Connected
                }
            }
        } else if snapshot.pairing_code.is_some() {
            LinkState::Unpaired
        } else {
            LinkState::Initializing
        }
    }
}
