use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::Role;

// -- Session claims --

/// JWT claims carried in the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Query string for links that only carry an anti-forgery token.
#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default, rename = "_token")]
    pub token: String,
}

// -- Events --

/// Raw create form as submitted by the browser. Every field defaults to
/// empty so that a malformed body still reaches the authorization check.
#[derive(Debug, Default, Deserialize)]
pub struct CreateEventForm {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_date: String,
    #[serde(default)]
    pub event_description: String,
    #[serde(default, rename = "_token")]
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid event date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid event fields: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// A create request after sanitization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub date: NaiveDate,
    #[validate(length(min = 1))]
    pub description: String,
}

impl CreateEventRequest {
    /// Builds a request from already-sanitized field values.
    pub fn new(name: String, date: &str, description: String) -> Result<Self, RequestError> {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| RequestError::InvalidDate(date.to_string()))?;

        let req = Self {
            name,
            date,
            description,
        };
        req.validate()?;
        Ok(req)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteEventQuery {
    pub event_id: Option<String>,
    #[serde(default, rename = "_token")]
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteEventRequest {
    pub event_id: i64,
}

impl From<&DeleteEventQuery> for DeleteEventRequest {
    fn from(query: &DeleteEventQuery) -> Self {
        Self {
            event_id: query.event_id.as_deref().map(coerce_int).unwrap_or(0),
        }
    }
}

/// Integer coercion for loosely-typed ids: leading whitespace and an
/// optional sign, then as many digits as present. No digits means 0,
/// overflow saturates.
pub fn coerce_int(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(d)) {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }

    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_int_accepts_numeric_prefix() {
        assert_eq!(coerce_int("42"), 42);
        assert_eq!(coerce_int("  7"), 7);
        assert_eq!(coerce_int("12abc"), 12);
        assert_eq!(coerce_int("-3"), -3);
        assert_eq!(coerce_int("+5"), 5);
    }

    #[test]
    fn coerce_int_falls_back_to_zero() {
        assert_eq!(coerce_int(""), 0);
        assert_eq!(coerce_int("abc"), 0);
        assert_eq!(coerce_int("-"), 0);
    }

    #[test]
    fn coerce_int_saturates() {
        assert_eq!(coerce_int("99999999999999999999"), i64::MAX);
        assert_eq!(coerce_int("-99999999999999999999"), i64::MIN);
    }

    #[test]
    fn missing_event_id_becomes_zero() {
        let query = DeleteEventQuery::default();
        assert_eq!(DeleteEventRequest::from(&query).event_id, 0);
    }

    #[test]
    fn create_request_parses_date() {
        let req = CreateEventRequest::new("Launch".into(), "2025-06-01", "Kickoff".into()).unwrap();
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn create_request_rejects_bad_date() {
        let err = CreateEventRequest::new("Launch".into(), "2025-13-01", "Kickoff".into()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidDate(_)));
    }

    #[test]
    fn create_request_rejects_empty_fields() {
        let err = CreateEventRequest::new(String::new(), "2025-06-01", "Kickoff".into()).unwrap_err();
        assert!(matches!(err, RequestError::Invalid(_)));

        let err = CreateEventRequest::new("Launch".into(), "2025-06-01", String::new()).unwrap_err();
        assert!(matches!(err, RequestError::Invalid(_)));
    }

    #[test]
    fn create_request_rejects_long_name() {
        let name = "x".repeat(256);
        assert!(CreateEventRequest::new(name, "2025-06-01", "Kickoff".into()).is_err());
    }
}
