pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Result, bail};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Table names after applying the configured prefix.
#[derive(Debug, Clone)]
pub struct Tables {
    pub events: String,
    pub users: String,
}

impl Tables {
    /// The prefix is spliced into SQL, so only `[A-Za-z0-9_]` is allowed.
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            bail!("Invalid table prefix {:?}: only letters, digits and '_' are allowed", prefix);
        }

        Ok(Self {
            events: format!("{prefix}simple_events"),
            users: format!("{prefix}users"),
        })
    }
}

pub struct Database {
    conn: Mutex<Connection>,
    tables: Tables,
}

impl Database {
    pub fn open(path: &Path, table_prefix: &str) -> Result<Self> {
        let tables = Tables::with_prefix(table_prefix)?;
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run(&conn, &tables)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
            tables,
        })
    }

    pub fn open_in_memory(table_prefix: &str) -> Result<Self> {
        let tables = Tables::with_prefix(table_prefix)?;
        let conn = Connection::open_in_memory()?;
        migrations::run(&conn, &tables)?;

        Ok(Self {
            conn: Mutex::new(conn),
            tables,
        })
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))?;
        f(&conn)
    }
}
