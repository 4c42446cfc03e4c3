// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the WhatsApp Web bridge sidecar.
//!
//! The bridge is a small Node process wrapping whatsapp-web.js. It exposes a
//! local REST surface for commands and a long-poll endpoint for lifecycle
//! events; this crate implements the worker side of both.

mod client;
mod events;

pub use client::BridgeClient;
pub use events::EventPump;
