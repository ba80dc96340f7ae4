use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use simple_events_db::Database;

use crate::nonce::NonceIssuer;

/// Runtime knobs the binary reads from its configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub secret: String,
    pub session_ttl: chrono::Duration,
    pub nonce_lifetime: Duration,
}

#[derive(Clone)]
pub struct AppState(Arc<AppStateInner>);

pub struct AppStateInner {
    pub db: Database,
    pub nonces: NonceIssuer,
    pub secret: String,
    pub session_ttl: chrono::Duration,
    cookie_key: Key,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Result<Self> {
        let nonces = NonceIssuer::new(settings.secret.as_bytes(), settings.nonce_lifetime)?;
        // Signed cookies need 64 bytes of key material.
        let cookie_key = Key::from(Sha512::digest(settings.secret.as_bytes()).as_slice());

        Ok(Self(Arc::new(AppStateInner {
            db,
            nonces,
            secret: settings.secret,
            session_ttl: settings.session_ttl,
            cookie_key,
        })))
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.0.cookie_key.clone()
    }
}
