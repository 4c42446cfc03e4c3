// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core error type, shared domain types, and the messaging client trait
//! for the wanotify outbound-notification worker.

pub mod client;
pub mod error;
pub mod types;

pub use client::MessagingClient;
pub use error::WanotifyError;
pub use types::{Chat, ClientEvent, QueueStatus, HEARTBEAT_KEY, LOGOUT_REQUEST_KEY, QR_CODE_KEY};
