//! Database row types; these map directly to SQLite rows.
use chrono::{NaiveDate, NaiveDateTime};
use simple_events_types::models::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: NaiveDateTime,
}

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub created_at: String,
}
