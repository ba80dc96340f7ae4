//! Anti-forgery tokens bound to an action name and a user.
//!
//! Time is split into ticks of half the token lifetime. A token is valid
//! during the tick it was issued in and the one after, so it lives between
//! `lifetime / 2` and `lifetime`.

use std::time::Duration;

use anyhow::{Result, anyhow};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Truncated tag length in bytes (20 hex chars on the wire).
const TOKEN_BYTES: usize = 10;

pub const CREATE_EVENT_ACTION: &str = "create_event";
pub const LOG_OUT_ACTION: &str = "log-out";

pub fn delete_event_action(event_id: i64) -> String {
    format!("delete_event_{event_id}")
}

pub struct NonceIssuer {
    key: HmacSha256,
    tick_secs: i64,
}

impl NonceIssuer {
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self> {
        let key = HmacSha256::new_from_slice(secret).map_err(|e| anyhow!("Invalid token secret: {}", e))?;
        let tick_secs = (lifetime.as_secs() / 2).max(1) as i64;
        Ok(Self { key, tick_secs })
    }

    pub fn create(&self, action: &str, user_id: Uuid) -> String {
        self.create_at(action, user_id, chrono::Utc::now().timestamp())
    }

    pub fn verify(&self, token: &str, action: &str, user_id: Uuid) -> bool {
        self.verify_at(token, action, user_id, chrono::Utc::now().timestamp())
    }

    fn create_at(&self, action: &str, user_id: Uuid, now: i64) -> String {
        let tag = self.mac(self.tick(now), action, user_id).finalize().into_bytes();
        hex::encode(&tag[..TOKEN_BYTES])
    }

    fn verify_at(&self, token: &str, action: &str, user_id: Uuid, now: i64) -> bool {
        let Ok(tag) = hex::decode(token) else {
            return false;
        };
        if tag.len() != TOKEN_BYTES {
            return false;
        }

        let tick = self.tick(now);
        [tick, tick - 1].into_iter().any(|t| {
            self.mac(t, action, user_id)
                .verify_truncated_left(&tag)
                .is_ok()
        })
    }

    fn tick(&self, now: i64) -> i64 {
        now.div_euclid(self.tick_secs) + 1
    }

    fn mac(&self, tick: i64, action: &str, user_id: Uuid) -> HmacSha256 {
        let mut mac = self.key.clone();
        mac.update(format!("{tick}|{action}|{user_id}").as_bytes());
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 3600;

    fn issuer() -> NonceIssuer {
        NonceIssuer::new(b"test-secret", Duration::from_secs(DAY)).unwrap()
    }

    #[test]
    fn token_verifies_for_same_action_and_user() {
        let nonces = issuer();
        let user = Uuid::new_v4();
        let token = nonces.create(CREATE_EVENT_ACTION, user);

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(nonces.verify(&token, CREATE_EVENT_ACTION, user));
    }

    #[test]
    fn token_is_bound_to_action() {
        let nonces = issuer();
        let user = Uuid::new_v4();
        let token = nonces.create(&delete_event_action(1), user);

        assert!(!nonces.verify(&token, &delete_event_action(2), user));
        assert!(!nonces.verify(&token, CREATE_EVENT_ACTION, user));
    }

    #[test]
    fn token_is_bound_to_user() {
        let nonces = issuer();
        let token = nonces.create(CREATE_EVENT_ACTION, Uuid::new_v4());
        assert!(!nonces.verify(&token, CREATE_EVENT_ACTION, Uuid::new_v4()));
    }

    #[test]
    fn token_is_bound_to_secret() {
        let user = Uuid::new_v4();
        let token = issuer().create(CREATE_EVENT_ACTION, user);
        let other = NonceIssuer::new(b"other-secret", Duration::from_secs(DAY)).unwrap();
        assert!(!other.verify(&token, CREATE_EVENT_ACTION, user));
    }

    #[test]
    fn token_expires_after_two_ticks() {
        let nonces = issuer();
        let user = Uuid::new_v4();
        let issued = 1_750_000_000;
        let token = nonces.create_at(CREATE_EVENT_ACTION, user, issued);

        let half = (DAY / 2) as i64;
        assert!(nonces.verify_at(&token, CREATE_EVENT_ACTION, user, issued + half));
        assert!(!nonces.verify_at(&token, CREATE_EVENT_ACTION, user, issued + 2 * half));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let nonces = issuer();
        let user = Uuid::new_v4();
        assert!(!nonces.verify("", CREATE_EVENT_ACTION, user));
        assert!(!nonces.verify("not-hex", CREATE_EVENT_ACTION, user));
        assert!(!nonces.verify("abcd", CREATE_EVENT_ACTION, user));
    }
}
