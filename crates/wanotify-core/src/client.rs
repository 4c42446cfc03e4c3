// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging client trait: the seam between the worker and the WhatsApp
//! Web bridge.

use async_trait::async_trait;

use crate::error::WanotifyError;
use crate::types::Chat;

/// Command surface of the messaging network client.
///
/// Lifecycle events (pairing code, ready, disconnect, auth failure) are
/// delivered separately as [`ClientEvent`](crate::types::ClientEvent)s over
/// an mpsc channel; this trait covers only the request/response calls.
///
/// Every method is a suspension point; implementations must not block the
/// underlying thread.
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Starts (or restarts) the connection. A fresh pairing code is issued
    /// as an event if the stored session is not reusable.
    async fn initialize(&self) -> Result<(), WanotifyError>;

    /// Terminates the authenticated session on the network side.
    async fn logout(&self) -> Result<(), WanotifyError>;

    /// Returns the raw connector-reported connection state string.
    async fn get_state(&self) -> Result<String, WanotifyError>;

    /// Returns the live roster of conversations visible to the session.
    async fn get_chats(&self) -> Result<Vec<Chat>, WanotifyError>;

    /// Sends a text message to an already-resolved chat identifier.
    async fn send_message(&self, chat_id: &str, body: &str) -> Result<(), WanotifyError>;
}
