use crate::Database;
use crate::models::{EventRow, UserRow};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use simple_events_types::models::Role;
use tracing::debug;

impl Database {
    // -- Events --

    /// Inserts one event and returns its id. `created_at` is filled by SQLite.
    pub fn create_event(&self, name: &str, date: NaiveDate, description: &str) -> Result<i64> {
        let table = &self.tables().events;
        self.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (event_name, event_date, event_description) VALUES (?1, ?2, ?3)"
                ),
                rusqlite::params![name, date, description],
            )?;
            let id = conn.last_insert_rowid();
            debug!("Inserted event {}", id);
            Ok(id)
        })
    }

    /// All events, earliest date first. Same-day events keep insertion order.
    pub fn list_events(&self) -> Result<Vec<EventRow>> {
        self.with_conn(|conn| query_events(conn, &self.tables().events))
    }

    /// Deletes by id and returns the number of rows removed. An unknown id
    /// removes nothing and is not an error.
    pub fn delete_event(&self, id: i64) -> Result<usize> {
        let table = &self.tables().events;
        self.with_conn(|conn| {
            let removed = conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
            debug!("Deleted {} row(s) for event {}", removed, id);
            Ok(removed)
        })
    }

    // -- Users --

    pub fn create_user(&self, id: &str, username: &str, password_hash: &str, role: Role) -> Result<()> {
        let table = &self.tables().users;
        self.with_conn(|conn| {
            conn.execute(
                &format!("INSERT INTO {table} (id, username, password, role) VALUES (?1, ?2, ?3, ?4)"),
                (id, username, password_hash, role.as_str()),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, &self.tables().users, username))
    }
}

fn query_events(conn: &Connection, table: &str) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, event_name, event_date, event_description, created_at
         FROM {table}
         ORDER BY event_date ASC, id ASC"
    ))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(EventRow {
                id: row.get(0)?,
                name: row.get(1)?,
                date: row.get(2)?,
                description: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_user_by_username(conn: &Connection, table: &str, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, username, password, role, created_at FROM {table} WHERE username = ?1"
    ))?;

    let row = stmt
        .query_row([username], |row| {
            let role: String = row.get(3)?;
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                // Unknown roles get no capabilities.
                role: Role::parse(&role).unwrap_or(Role::Subscriber),
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn db() -> Database {
        Database::open_in_memory("").unwrap()
    }

    #[test]
    fn create_then_list() {
        let db = db();
        let id = db.create_event("Launch", date("2025-06-01"), "Kickoff").unwrap();

        let events = db.list_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);
        assert_eq!(events[0].name, "Launch");
        assert_eq!(events[0].date, date("2025-06-01"));
        assert_eq!(events[0].description, "Kickoff");
    }

    #[test]
    fn ids_are_monotonic() {
        let db = db();
        let a = db.create_event("a", date("2025-01-01"), "x").unwrap();
        let b = db.create_event("b", date("2025-01-01"), "x").unwrap();
        db.delete_event(b).unwrap();
        let c = db.create_event("c", date("2025-01-01"), "x").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn list_is_sorted_by_date_then_insertion() {
        let db = db();
        db.create_event("late", date("2025-12-01"), "x").unwrap();
        db.create_event("early", date("2024-02-10"), "x").unwrap();
        db.create_event("same-day-1", date("2025-03-03"), "x").unwrap();
        db.create_event("same-day-2", date("2025-03-03"), "x").unwrap();

        let names: Vec<_> = db.list_events().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["early", "same-day-1", "same-day-2", "late"]);
    }

    #[test]
    fn delete_removes_only_that_event() {
        let db = db();
        let keep = db.create_event("keep", date("2025-01-01"), "x").unwrap();
        let gone = db.create_event("gone", date("2025-01-02"), "x").unwrap();

        assert_eq!(db.delete_event(gone).unwrap(), 1);

        let events = db.list_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, keep);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let db = db();
        db.create_event("keep", date("2025-01-01"), "x").unwrap();

        assert_eq!(db.delete_event(9999).unwrap(), 0);
        assert_eq!(db.delete_event(0).unwrap(), 0);
        assert_eq!(db.list_events().unwrap().len(), 1);
    }

    #[test]
    fn insert_into_missing_table_is_an_error() {
        let db = db();
        db.with_conn(|conn| {
            conn.execute_batch("DROP TABLE simple_events")?;
            Ok(())
        })
        .unwrap();

        assert!(db.create_event("a", date("2025-01-01"), "x").is_err());
        assert!(db.delete_event(1).is_err());
    }

    #[test]
    fn users_roundtrip_through_lookup() {
        let db = db();
        db.create_user("u1", "admin", "hash", Role::Administrator).unwrap();

        let user = db.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.role, Role::Administrator);
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = db();
        db.create_user("u1", "admin", "hash", Role::Administrator).unwrap();
        assert!(db.create_user("u2", "admin", "hash", Role::Subscriber).is_err());
    }
}
