// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command client for the bridge's REST surface.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wanotify_core::{Chat, MessagingClient, WanotifyError};

#[derive(Deserialize)]
struct StateResponse {
    state: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    chat_id: &'a str,
    body: &'a str,
}

/// [`MessagingClient`] implementation backed by the bridge sidecar.
///
/// All endpoints are local; the 30-second timeout covers the slow paths
/// (session initialization, roster enumeration on a large account).
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: reqwest::Client,
    base_url: String,
}

impl BridgeClient {
    pub fn new(base_url: &str) -> Result<Self, WanotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WanotifyError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(
        response: Result<reqwest::Response, reqwest::Error>,
        what: &str,
    ) -> Result<reqwest::Response, WanotifyError> {
        let response = response.map_err(|e| WanotifyError::Channel {
            message: format!("{what}: request failed: {e}"),
            source: Some(Box::new(e)),
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WanotifyError::channel(format!(
                "{what}: bridge returned {status}: {body}"
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl MessagingClient for BridgeClient {
    async fn initialize(&self) -> Result<(), WanotifyError> {
        debug!("requesting session initialization");
        let response = self.client.post(self.url("/session/initialize")).send().await;
        Self::check(response, "initialize").await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), WanotifyError> {
        debug!("requesting session logout");
        let response = self.client.post(self.url("/session/logout")).send().await;
        Self::check(response, "logout").await?;
        Ok(())
    }

    async fn get_state(&self) -> Result<String, WanotifyError> {
        let response = self.client.get(self.url("/session/state")).send().await;
        let response = Self::check(response, "get_state").await?;
        let parsed: StateResponse =
            response.json().await.map_err(|e| WanotifyError::Channel {
                message: format!("get_state: malformed response: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(parsed.state)
    }

    async fn get_chats(&self) -> Result<Vec<Chat>, WanotifyError> {
        let response = self.client.get(self.url("/chats")).send().await;
        let response = Self::check(response, "get_chats").await?;
        response.json().await.map_err(|e| WanotifyError::Channel {
            message: format!("get_chats: malformed response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    async fn send_message(&self, chat_id: &str, body: &str) -> Result<(), WanotifyError> {
        let response = self
            .client
            .post(self.url("/messages"))
            .json(&SendRequest { chat_id, body })
            .send()
            .await;
        Self::check(response, "send_message").await?;
        Ok(())
    }
}
