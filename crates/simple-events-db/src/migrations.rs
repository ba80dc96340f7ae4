use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::Tables;

/// Creates the tables if missing. Safe to run on every start: existing
/// tables and rows are left untouched.
pub fn run(conn: &Connection, tables: &Tables) -> Result<()> {
    let events = &tables.events;
    let users = &tables.users;

    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {events} (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            event_name          TEXT NOT NULL CHECK (length(event_name) <= 255),
            event_date          TEXT NOT NULL,
            event_description   TEXT NOT NULL,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_{events}_date
            ON {events}(event_date, id);

        CREATE TABLE IF NOT EXISTS {users} (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'subscriber',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    ))
    .with_context(|| format!("Failed to create table {events}"))?;

    info!("Database migrations complete");
    Ok(())
}
