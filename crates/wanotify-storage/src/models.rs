// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row structs for the queue and config-store tables.

use wanotify_core::QueueStatus;

/// One row of the `whatsapp_queue` table.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub id: i64,
    /// Ticket the notification originated from; logging context only.
    pub ticket_id: String,
    /// Raw targeting expression: a single identifier or a comma-separated
    /// list of `target[:STATE]` pairs.
    pub phone_number: String,
    pub message: String,
    /// Current SLA state tag(s), comma-separated for multi-state membership.
    pub sla_state: Option<String>,
    pub status: QueueStatus,
    pub created_at_utc: String,
    pub sent_at_utc: Option<String>,
}

/// Fields supplied by a producer when enqueuing a notification.
#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub ticket_id: String,
    pub phone_number: String,
    pub message: String,
    pub sla_state: Option<String>,
}
