// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value operations on the shared `system_config` table.
//!
//! The admin UI reads these keys; the worker is the single writer of
//! `whatsappQRCode` and `whatsappHeartbeat`, and the single consumer of
//! the logout sentinel. Writes are overwrite-only (upsert on conflict).

use rusqlite::params;
use wanotify_core::WanotifyError;

use crate::database::Database;

/// Upsert a JSON value under `key`, overwriting any previous value.
pub async fn put(
    db: &Database,
    key: &str,
    value: serde_json::Value,
) -> Result<(), WanotifyError> {
    let key = key.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO system_config (config_key, config_value, updated_at_utc)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(config_key) DO UPDATE SET
                     config_value = excluded.config_value,
                     updated_at_utc = excluded.updated_at_utc",
                params![key, value],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read the JSON value stored under `key`, if any.
pub async fn get(db: &Database, key: &str) -> Result<Option<serde_json::Value>, WanotifyError> {
    let key = key.to_string();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT config_value FROM system_config WHERE config_key = ?1",
                params![key],
                |row| row.get(0),
            );
            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match raw {
        Some(text) => {
            let value = serde_json::from_str(&text).map_err(|e| WanotifyError::Storage {
                source: Box::new(e),
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Delete the value stored under `key`. Deleting a missing key is a no-op.
pub async fn delete(db: &Database, key: &str) -> Result<(), WanotifyError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM system_config WHERE config_key = ?1",
                params![key],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (db, _dir) = setup_db().await;

        put(&db, "whatsappQRCode", json!("2@abc123")).await.unwrap();
        let value = get(&db, "whatsappQRCode").await.unwrap();
        assert_eq!(value, Some(json!("2@abc123")));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn put_overwrites_existing_value() {
        let (db, _dir) = setup_db().await;

        put(&db, "whatsappHeartbeat", json!({"ts": "t1", "state": "INITIALIZING"}))
            .await
            .unwrap();
        put(&db, "whatsappHeartbeat", json!({"ts": "t2", "state": "CONNECTED"}))
            .await
            .unwrap();

        let value = get(&db, "whatsappHeartbeat").await.unwrap().unwrap();
        assert_eq!(value["ts"], "t2");
        assert_eq!(value["state"], "CONNECTED");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_key_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get(&db, "noSuchKey").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_key_and_is_idempotent() {
        let (db, _dir) = setup_db().await;

        put(&db, "whatsappLogoutRequest", json!(true)).await.unwrap();
        delete(&db, "whatsappLogoutRequest").await.unwrap();
        assert!(get(&db, "whatsappLogoutRequest").await.unwrap().is_none());

        // Deleting again must not error.
        delete(&db, "whatsappLogoutRequest").await.unwrap();

        db.close().await.unwrap();
    }
}
