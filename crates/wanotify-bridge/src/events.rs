// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-poll event pump: bridges the sidecar's lifecycle events onto the
//! worker's mpsc channel.

use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wanotify_core::{ClientEvent, WanotifyError};

/// Wire shape of one lifecycle event from `GET /events`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BridgeEvent {
    PairingCode { code: String },
    Ready,
    Disconnected { reason: String },
    AuthFailure { message: String },
}

impl From<BridgeEvent> for ClientEvent {
    fn from(event: BridgeEvent) -> Self {
        match event {
            BridgeEvent::PairingCode { code } => ClientEvent::PairingCode(code),
            BridgeEvent::Ready => ClientEvent::Ready,
            BridgeEvent::Disconnected { reason } => ClientEvent::Disconnected(reason),
            BridgeEvent::AuthFailure { message } => ClientEvent::AuthFailure(message),
        }
    }
}

/// Repeatedly long-polls `GET /events?wait=N` and forwards events.
///
/// An empty response is the normal long-poll timeout. Transport errors are
/// logged and retried after a short backoff so a bridge restart does not
/// kill the pump.
pub struct EventPump {
    client: reqwest::Client,
    events_url: String,
    wait_secs: u64,
    tx: mpsc::Sender<ClientEvent>,
}

impl EventPump {
    pub fn new(
        base_url: &str,
        wait_secs: u64,
        tx: mpsc::Sender<ClientEvent>,
    ) -> Result<Self, WanotifyError> {
        // The request timeout must outlast the long-poll window itself,
        // plus transit slack.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(wait_secs + 10))
            .build()
            .map_err(|e| WanotifyError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            events_url: format!("{}/events", base_url.trim_end_matches('/')),
            wait_secs,
            tx,
        })
    }

    /// Pump events until cancelled or the receiving side is dropped.
    pub async fn run(&self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("event pump stopped");
                    return;
                }
                result = self.poll_once() => match result {
                    Ok(events) => {
                        for event in events {
                            if self.tx.send(event.into()).await.is_err() {
                                warn!("event receiver dropped; stopping pump");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "event poll failed; backing off");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                },
            }
        }
    }

    async fn poll_once(&self) -> Result<Vec<BridgeEvent>, reqwest::Error> {
        let response = self
            .client
            .get(&self.events_url)
            .query(&[("wait", self.wait_secs)])
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn forwards_events_in_order_then_stops_on_cancel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(query_param("wait", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"type": "pairing_code", "code": "2@abc"},
                {"type": "ready"},
            ])))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(8);
        let pump = EventPump::new(&server.uri(), 5, tx).unwrap();
        let cancel = CancellationToken::new();

        let cancel_clone = cancel.clone();
        let handle = tokio::spawn(async move { pump.run(cancel_clone).await });

        assert!(matches!(
            rx.recv().await,
            Some(ClientEvent::PairingCode(code)) if code == "2@abc"
        ));
        assert!(matches!(rx.recv().await, Some(ClientEvent::Ready)));

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn empty_batch_is_a_quiet_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(8);
        let pump = EventPump::new(&server.uri(), 1, tx).unwrap();
        let cancel = CancellationToken::new();

        let cancel_clone = cancel.clone();
        let handle = tokio::spawn(async move { pump.run(cancel_clone).await });

        // Give the pump a couple of cycles; nothing must arrive.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn disconnect_and_auth_failure_carry_their_payloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"type": "disconnected", "reason": "NAVIGATION"},
                {"type": "auth_failure", "message": "bad session"},
            ])))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::channel(8);
        let pump = EventPump::new(&server.uri(), 1, tx).unwrap();
        let cancel = CancellationToken::new();

        let cancel_clone = cancel.clone();
        let handle = tokio::spawn(async move { pump.run(cancel_clone).await });

        assert!(matches!(
            rx.recv().await,
            Some(ClientEvent::Disconnected(reason)) if reason == "NAVIGATION"
        ));
        assert!(matches!(
            rx.recv().await,
            Some(ClientEvent::AuthFailure(message)) if message == "bad session"
        ));

        cancel.cancel();
        handle.await.unwrap();
    }
}
