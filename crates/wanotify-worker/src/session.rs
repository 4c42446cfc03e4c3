// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle manager for the messaging connection.
//!
//! Owns the readiness flag and the published pairing code, reacts to client
//! lifecycle events, and executes the operator-driven logout/reinit path.
//! Consumers observe the session through a read-only `watch` handle; the
//! manager is the only writer.
//!
//! Events arrive on the single-threaded scheduler; each handler runs to
//! completion before the next event or timer fires.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use wanotify_core::{ClientEvent, MessagingClient, LOGOUT_REQUEST_KEY, QR_CODE_KEY};
use wanotify_storage::queries::config_store;
use wanotify_storage::Database;

/// Read-only view of the session published to the poller and heartbeat.
///
/// Invariant: `ready` and `pairing_code` are mutually exclusive; the admin
/// UI displays one or the other, never both.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub ready: bool,
    pub pairing_code: Option<String>,
}

/// Named states of the session FSM.
///
/// `Initializing -> Unpaired (pairing code issued) -> Connected (ready)
/// -> {Disconnected, Error} -> Initializing (on reinit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Unpaired,
    Connected,
    Disconnected,
    Error,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Initializing => write!(f, "initializing"),
            SessionPhase::Unpaired => write!(f, "unpaired"),
            SessionPhase::Connected => write!(f, "connected"),
            SessionPhase::Disconnected => write!(f, "disconnected"),
            SessionPhase::Error => write!(f, "error"),
        }
    }
}

/// Maintains the one connection to the messaging network and publishes its
/// state to the shared config store.
pub struct SessionManager {
    client: Arc<dyn MessagingClient>,
    db: Database,
    state_tx: watch::Sender<SessionSnapshot>,
    phase: Mutex<SessionPhase>,
}

impl SessionManager {
    pub fn new(client: Arc<dyn MessagingClient>, db: Database) -> Self {
        let (state_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            client,
            db,
            state_tx,
            phase: Mutex::new(SessionPhase::Initializing),
        }
    }

    /// Returns a read-only handle to the session snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// Current FSM phase.
    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether the connection is usable for sends.
    pub fn is_ready(&self) -> bool {
        self.state_tx.borrow().ready
    }

    fn set_phase(&self, next: SessionPhase) {
        let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
        if *phase != next {
            debug!(from = %phase, to = %next, "session phase transition");
            *phase = next;
        }
    }

    /// Consume client lifecycle events until the channel closes or the
    /// token is cancelled.
    pub async fn run(
        self: Arc<Self>,
        mut events: mpsc::Receiver<ClientEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("session event loop stopped");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("client event channel closed");
                        break;
                    }
                },
            }
        }
    }

    /// Dispatch one lifecycle event to its transition handler.
    pub async fn handle_event(&self, event: ClientEvent) {
        match event {
            ClientEvent::PairingCode(code) => self.on_pairing_code(code).await,
            ClientEvent::Ready => self.on_ready().await,
            ClientEvent::Disconnected(reason) => self.on_disconnected(&reason),
            ClientEvent::AuthFailure(message) => self.on_auth_failure(&message),
        }
    }

    /// A pairing code was issued: publish it for the admin UI to render.
    async fn on_pairing_code(&self, code: String) {
        self.set_phase(SessionPhase::Unpaired);
        self.state_tx.send_modify(|s| {
            s.ready = false;
            s.pairing_code = Some(code.clone());
        });
        info!("pairing code issued; scan required");

        if let Err(e) = config_store::put(&self.db, QR_CODE_KEY, json!(code)).await {
            warn!(error = %e, "failed to publish pairing code");
        }
    }

    /// The session authenticated: clear the pairing code and mark ready.
    async fn on_ready(&self) {
        self.set_phase(SessionPhase::Connected);
        self.state_tx.send_modify(|s| {
            s.ready = true;
            s.pairing_code = None;
        });

        if let Err(e) = config_store::delete(&self.db, QR_CODE_KEY).await {
            warn!(error = %e, "failed to clear pairing code");
        }

        // Roster enumeration is diagnostics only.
        match self.client.get_chats().await {
            Ok(chats) => info!(chats = chats.len(), "session ready; roster loaded"),
            Err(e) => {
                info!("session ready");
                debug!(error = %e, "roster enumeration failed");
            }
        }
    }

    fn on_disconnected(&self, reason: &str) {
        self.set_phase(SessionPhase::Disconnected);
        self.state_tx.send_modify(|s| s.ready = false);
        warn!(reason, "session disconnected");
    }

    fn on_auth_failure(&self, message: &str) {
        self.set_phase(SessionPhase::Error);
        self.state_tx.send_modify(|s| s.ready = false);
        error!(message, "authentication failure");
    }

    /// Execute the operator-driven logout/reinit path.
    ///
    /// Called by the poller when the logout sentinel appears in the config
    /// store. Every step is best-effort: a failed logout or reinit is logged
    /// and must not crash the process, which keeps polling and can recover
    /// on the next request.
    pub async fn handle_logout_request(&self) {
        info!("logout requested via config store");

        self.state_tx.send_modify(|s| {
            s.ready = false;
            s.pairing_code = None;
        });
        self.set_phase(SessionPhase::Initializing);

        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "logout failed; continuing with reinit");
        }

        if let Err(e) = config_store::delete(&self.db, LOGOUT_REQUEST_KEY).await {
            warn!(error = %e, "failed to delete logout sentinel");
        }
        if let Err(e) = config_store::delete(&self.db, QR_CODE_KEY).await {
            warn!(error = %e, "failed to clear stale pairing code");
        }

        // Reinitialize to obtain a fresh pairing code.
        if let Err(e) = self.client.initialize().await {
            warn!(error = %e, "reinitialization failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_phase_display() {
        assert_eq!(SessionPhase::Initializing.to_string(), "initializing");
        assert_eq!(SessionPhase::Unpaired.to_string(), "unpaired");
        assert_eq!(SessionPhase::Connected.to_string(), "connected");
        assert_eq!(SessionPhase::Disconnected.to_string(), "disconnected");
        assert_eq!(SessionPhase::Error.to_string(), "error");
    }

    #[test]
    fn snapshot_defaults_to_not_ready_and_unpaired() {
        let snapshot = SessionSnapshot::default();
        assert!(!snapshot.ready);
        assert!(snapshot.pairing_code.is_none());
    }
}
