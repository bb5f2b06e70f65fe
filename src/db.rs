// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::PathBuf;

use crate::error::LedgerResult;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Cashbook", "cashbook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "opened local store");
    Ok(conn)
}

/// Fresh in-memory store with the full schema, for tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- host key-value storage: session tokens, cached profile, receipt
    -- metadata, and the standalone ledger document
    CREATE TABLE IF NOT EXISTS local_storage(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

pub fn kv_get(conn: &Connection, key: &str) -> LedgerResult<Option<String>> {
    let v = conn
        .query_row(
            "SELECT value FROM local_storage WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn kv_set(conn: &Connection, key: &str, value: &str) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO local_storage(key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

pub fn kv_remove(conn: &Connection, key: &str) -> LedgerResult<()> {
    conn.execute("DELETE FROM local_storage WHERE key=?1", params![key])?;
    Ok(())
}

pub fn kv_get_json<T: serde::de::DeserializeOwned>(
    conn: &Connection,
    key: &str,
) -> LedgerResult<Option<T>> {
    match kv_get(conn, key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn kv_set_json<T: serde::Serialize>(
    conn: &Connection,
    key: &str,
    value: &T,
) -> LedgerResult<()> {
    kv_set(conn, key, &serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_roundtrip_and_overwrite() {
        let conn = open_in_memory().unwrap();
        assert_eq!(kv_get(&conn, "token").unwrap(), None);
        kv_set(&conn, "token", "a").unwrap();
        kv_set(&conn, "token", "b").unwrap();
        assert_eq!(kv_get(&conn, "token").unwrap().as_deref(), Some("b"));
        kv_remove(&conn, "token").unwrap();
        assert_eq!(kv_get(&conn, "token").unwrap(), None);
    }

    #[test]
    fn json_values() {
        let conn = open_in_memory().unwrap();
        kv_set_json(&conn, "list", &vec![1, 2, 3]).unwrap();
        let v: Vec<i32> = kv_get_json(&conn, "list").unwrap().unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }
}
