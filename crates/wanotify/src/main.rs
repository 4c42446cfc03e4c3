// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wanotify - WhatsApp outbound notification worker.
//!
//! Binary entry point: loads configuration, opens the queue database,
//! connects to the bridge sidecar, and runs the session, heartbeat, and
//! poller loops until a shutdown signal arrives.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use wanotify_bridge::{BridgeClient, EventPump};
use wanotify_config::WanotifyConfig;
use wanotify_core::{MessagingClient, WanotifyError};
use wanotify_storage::Database;
use wanotify_worker::{locks, shutdown, HeartbeatEmitter, QueuePoller, SessionManager};

#[tokio::main]
async fn main() {
    let config = match wanotify_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            wanotify_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.worker.log_level);

    if let Err(e) = run(config).await {
        error!(error = %e, "worker exited with error");
        std::process::exit(1);
    }
}

async fn run(config: WanotifyConfig) -> Result<(), WanotifyError> {
    info!(
        database = %config.storage.database_path,
        bridge = %config.bridge.base_url,
        "starting wanotify worker"
    );

    // Stale browser locks from an unclean shutdown block the next bridge
    // start; clear them before anything touches the session.
    if let Some(session_path) = &config.worker.session_path {
        locks::cleanup_session_locks(Path::new(session_path));
    }

    let db = Database::open(&config.storage.database_path).await?;

    let client: Arc<dyn MessagingClient> =
        Arc::new(BridgeClient::new(&config.bridge.base_url)?);

    let session = Arc::new(SessionManager::new(client.clone(), db.clone()));
    let heartbeat = HeartbeatEmitter::new(
        client.clone(),
        db.clone(),
        session.subscribe(),
        Duration::from_secs(config.heartbeat.interval_secs),
    );
    let poller = QueuePoller::new(
        db.clone(),
        client.clone(),
        session.clone(),
        Duration::from_secs(config.poller.interval_secs),
        config.poller.batch_size,
    );

    let (event_tx, event_rx) = mpsc::channel(64);
    let pump = EventPump::new(&config.bridge.base_url, config.bridge.event_wait_secs, event_tx)?;

    let cancel = shutdown::install_signal_handler();

    let session_task = tokio::spawn({
        let session = session.clone();
        let cancel = cancel.clone();
        async move { session.run(event_rx, cancel).await }
    });
    let pump_task = tokio::spawn({
        let cancel = cancel.clone();
        async move { pump.run(cancel).await }
    });
    let heartbeat_task = tokio::spawn({
        let cancel = cancel.clone();
        async move { heartbeat.run(cancel).await }
    });
    let poller_task = tokio::spawn({
        let cancel = cancel.clone();
        async move { poller.run(cancel).await }
    });

    // Kick off the connection; a pairing code arrives as an event if the
    // stored session is not reusable.
    if let Err(e) = client.initialize().await {
        warn!(error = %e, "initial session start failed; will retry on logout request");
    }

    cancel.cancelled().await;
    info!("shutdown signal received; draining");

    for task in [session_task, pump_task, heartbeat_task, poller_task] {
        if let Err(e) = task.await {
            warn!(error = %e, "worker task panicked during shutdown");
        }
    }

    db.close().await?;
    info!("wanotify worker stopped");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wanotify={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = wanotify_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.worker.log_level, "info");
        assert_eq!(config.poller.batch_size, 5);
    }
}
