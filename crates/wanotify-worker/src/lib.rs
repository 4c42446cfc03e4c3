// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The wanotify worker core: session lifecycle management, heartbeat
//! emission, queue polling, and message routing.

pub mod heartbeat;
pub mod locks;
pub mod poller;
pub mod router;
pub mod session;
pub mod shutdown;

pub use heartbeat::{HeartbeatEmitter, LinkState};
pub use poller::QueuePoller;
pub use session::{SessionManager, SessionPhase, SessionSnapshot};
