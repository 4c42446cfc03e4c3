// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue poller: drains pending notifications at a bounded rate while
//! gating on session readiness.
//!
//! Each tick checks the logout sentinel first, unconditionally. When the
//! session is ready it then fetches a bounded batch of pending rows in
//! creation order and processes them strictly sequentially. Any error
//! escaping a cycle is caught and logged; the timer continues.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wanotify_core::{MessagingClient, QueueStatus, WanotifyError, LOGOUT_REQUEST_KEY};
use wanotify_storage::queries::{config_store, queue};
use wanotify_storage::{Database, NotificationRequest};

use crate::router;
use crate::session::{SessionManager, SessionSnapshot};

/// Polls the queue table and dispatches pending rows through the router.
pub struct QueuePoller {
    db: Database,
    client: Arc<dyn MessagingClient>,
    session: Arc<SessionManager>,
    state_rx: watch::Receiver<SessionSnapshot>,
    interval: Duration,
    batch_size: u32,
}

impl QueuePoller {
    pub fn new(
        db: Database,
        client: Arc<dyn MessagingClient>,
        session: Arc<SessionManager>,
        interval: Duration,
        batch_size: u32,
    ) -> Self {
        let state_rx = session.subscribe();
        Self {
            db,
            client,
            session,
            state_rx,
            interval,
            batch_size,
        }
    }

    /// Poll until cancelled.
    ///
    /// Cancellation is only observed between cycles: a tick in flight runs
    /// to completion, so a row being processed always reaches its terminal
    /// status before shutdown.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("queue poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!(error = %e, "poll cycle failed");
                    }
                }
            }
        }
    }

    /// Run one poll cycle.
    pub async fn tick(&self) -> Result<(), WanotifyError> {
        // Sentinel check happens regardless of readiness.
        if config_store::get(&self.db, LOGOUT_REQUEST_KEY).await?.is_some() {
            self.session.handle_logout_request().await;
        }

        if !self.state_rx.borrow().ready {
            return Ok(());
        }

        let rows = queue::fetch_pending(&self.db, self.batch_size).await?;
        for row in rows {
            self.process(row).await?;
        }
        Ok(())
    }

    /// Route one row and persist its terminal status exactly once.
    async fn process(&self, row: NotificationRequest) -> Result<(), WanotifyError> {
        debug!(id = row.id, ticket_id = %row.ticket_id, "processing notification");

        let outcome = router::dispatch(self.client.as_ref(), &row).await;
        let status = outcome.terminal_status();

        info!(
            id = row.id,
            ticket_id = %row.ticket_id,
            sent = outcome.sent,
            failed = outcome.failed,
            skipped = outcome.skipped,
            status = %status,
            "notification processed"
        );
        metrics::counter!("wanotify_rows_processed_total").increment(1);

        match status {
            QueueStatus::Sent => queue::mark_sent(&self.db, row.id).await,
            _ => queue::mark_failed(&self.db, row.id).await,
        }
    }
}
