use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use simple_events_api::state::Settings;

const DEFAULT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub secret: String,
    pub table_prefix: String,
    pub session_hours: i64,
    pub nonce_hours: u64,
    pub admin: Option<AdminCredentials>,
}

#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every `SIMPLE_EVENTS_*` setting through `lookup`, falling back
    /// to defaults for the unset ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("SIMPLE_EVENTS_PORT", "3000")
            .parse()
            .context("SIMPLE_EVENTS_PORT must be a port number")?;
        let session_hours = var("SIMPLE_EVENTS_SESSION_HOURS", "12")
            .parse()
            .context("SIMPLE_EVENTS_SESSION_HOURS must be an integer")?;
        let nonce_hours = var("SIMPLE_EVENTS_NONCE_HOURS", "24")
            .parse()
            .context("SIMPLE_EVENTS_NONCE_HOURS must be an integer")?;

        let admin = match (
            lookup("SIMPLE_EVENTS_ADMIN_USERNAME"),
            lookup("SIMPLE_EVENTS_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminCredentials { username, password })
            }
            _ => None,
        };

        Ok(Self {
            host: var("SIMPLE_EVENTS_HOST", "0.0.0.0"),
            port,
            db_path: PathBuf::from(var("SIMPLE_EVENTS_DB_PATH", "simple-events.db")),
            secret: var("SIMPLE_EVENTS_SECRET", DEFAULT_SECRET),
            table_prefix: var("SIMPLE_EVENTS_TABLE_PREFIX", ""),
            session_hours,
            nonce_hours,
            admin,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn settings(&self) -> Settings {
        Settings {
            secret: self.secret.clone(),
            session_ttl: chrono::Duration::hours(self.session_hours),
            nonce_lifetime: Duration::from_secs(self.nonce_hours * 3600),
        }
    }
}
