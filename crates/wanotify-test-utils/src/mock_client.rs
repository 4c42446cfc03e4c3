// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`MessagingClient`] double with call capture and scriptable
//! failures.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use wanotify_core::{Chat, MessagingClient, WanotifyError};

/// A scriptable messaging client for tests.
///
/// Captures every send, counts lifecycle calls, and fails on demand: mark
/// individual chat identifiers as failing, or flip the logout/state-query
/// switches.
#[derive(Default)]
pub struct MockClient {
    sent: Mutex<Vec<(String, String)>>,
    roster: Mutex<Vec<Chat>>,
    failing_chats: Mutex<HashSet<String>>,
    raw_state: Mutex<String>,
    fail_get_state: Mutex<bool>,
    fail_logout: Mutex<bool>,
    initialize_calls: Mutex<u32>,
    logout_calls: Mutex<u32>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            raw_state: Mutex::new("CONNECTED".to_string()),
            ..Self::default()
        }
    }

    /// Replace the roster returned by `get_chats`.
    pub fn set_roster(&self, chats: Vec<Chat>) {
        *self.roster.lock().unwrap() = chats;
    }

    /// Make every send to `chat_id` fail.
    pub fn fail_chat(&self, chat_id: &str) {
        self.failing_chats.lock().unwrap().insert(chat_id.to_string());
    }

    /// Set the raw state string reported by `get_state`.
    pub fn set_raw_state(&self, raw: &str) {
        *self.raw_state.lock().unwrap() = raw.to_string();
    }

    /// Make `get_state` fail.
    pub fn fail_get_state(&self) {
        *self.fail_get_state.lock().unwrap() = true;
    }

    /// Make `logout` fail.
    pub fn fail_logout(&self) {
        *self.fail_logout.lock().unwrap() = true;
    }

    /// Every `(chat_id, body)` pair sent so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn initialize_calls(&self) -> u32 {
        *self.initialize_calls.lock().unwrap()
    }

    pub fn logout_calls(&self) -> u32 {
        *self.logout_calls.lock().unwrap()
    }
}

#[async_trait]
impl MessagingClient for MockClient {
    async fn initialize(&self) -> Result<(), WanotifyError> {
        *self.initialize_calls.lock().unwrap() += 1;
        Ok(())
    }

    async fn logout(&self) -> Result<(), WanotifyError> {
        *self.logout_calls.lock().unwrap() += 1;
        if *self.fail_logout.lock().unwrap() {
            return Err(WanotifyError::channel("logout refused"));
        }
        Ok(())
    }

    async fn get_state(&self) -> Result<String, WanotifyError> {
        if *self.fail_get_state.lock().unwrap() {
            return Err(WanotifyError::channel("state query failed"));
        }
        Ok(self.raw_state.lock().unwrap().clone())
    }

    async fn get_chats(&self) -> Result<Vec<Chat>, WanotifyError> {
        Ok(self.roster.lock().unwrap().clone())
    }

    async fn send_message(&self, chat_id: &str, body: &str) -> Result<(), WanotifyError> {
        if self.failing_chats.lock().unwrap().contains(chat_id) {
            return Err(WanotifyError::channel(format!("send to {chat_id} failed")));
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), body.to_string()));
        Ok(())
    }
}
