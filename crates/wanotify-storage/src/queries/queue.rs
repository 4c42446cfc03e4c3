// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue operations for outbound notification rows.
//!
//! Rows are created as `PENDING` and moved exactly once to a terminal
//! status (`SENT` or `FAILED`). Terminal rows are never selected again.

use rusqlite::params;
use wanotify_core::{QueueStatus, WanotifyError};

use crate::database::Database;
use crate::models::{NewNotification, NotificationRequest};

/// Enqueue a new notification. Returns the auto-generated row ID.
///
/// Used by tests and available to external producers; the admin backend
/// normally inserts rows directly.
pub async fn enqueue(db: &Database, new: NewNotification) -> Result<i64, WanotifyError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO whatsapp_queue (ticket_id, phone_number, message, sla_state)
                 VALUES (?1, ?2, ?3, ?4)",
                params![new.ticket_id, new.phone_number, new.message, new.sla_state],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch up to `limit` pending rows, oldest first.
///
/// Rows are returned in creation order; `id` breaks ties between rows
/// created in the same millisecond.
pub async fn fetch_pending(
    db: &Database,
    limit: u32,
) -> Result<Vec<NotificationRequest>, WanotifyError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, ticket_id, phone_number, message, sla_state,
                        status, created_at_utc, sent_at_utc
                 FROM whatsapp_queue
                 WHERE status = 'PENDING'
                 ORDER BY created_at_utc ASC, id ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], map_row)?;
            let mut pending = Vec::new();
            for row in rows {
                pending.push(row?);
            }
            Ok(pending)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a row as sent, stamping `sent_at_utc`.
pub async fn mark_sent(db: &Database, id: i64) -> Result<(), WanotifyError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE whatsapp_queue
                 SET status = 'SENT',
                     sent_at_utc = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a row as failed. Failed rows are inert; there is no retry.
pub async fn mark_failed(db: &Database, id: i64) -> Result<(), WanotifyError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE whatsapp_queue SET status = 'FAILED' WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_row(row: &rusqlite::Row<'_>) -> Result<NotificationRequest, rusqlite::Error> {
    let status: String = row.get(5)?;
    let status: QueueStatus = status.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(NotificationRequest {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        phone_number: row.get(2)?,
        message: row.get(3)?,
        sla_state: row.get(4)?,
        status,
        created_at_utc: row.get(6)?,
        sent_at_utc: row.get(7)?,
    })
}
