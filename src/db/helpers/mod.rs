use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;

pub(crate) fn kv_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()
        .with_context(|| format!("failed to read storage key '{key}'"))?;
    Ok(value)
}

pub(crate) fn kv_put(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("failed to write storage key '{key}'"))?;
    Ok(())
}

pub(crate) fn kv_delete(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
        .with_context(|| format!("failed to delete storage key '{key}'"))?;
    Ok(())
}

/// A present-but-malformed blob is a hard error for that read; it is never
/// silently treated as empty.
pub(crate) fn decode_json<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("malformed JSON under storage key '{key}'"))
}
