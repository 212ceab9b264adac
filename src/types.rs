//! Domain and wire types for the todo API.
//!
//! # Design
//! `User` and `Todo` double as the stored records and the response bodies;
//! request payloads get their own structs so each endpoint's schema is
//! explicit instead of destructured ad hoc. Deadlines travel as strings and
//! go through [`parse_deadline`], which accepts RFC 3339 plus two laxer
//! forms; anything else is rejected before any store mutation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// A registered user and the todos they own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub todos: Vec<Todo>,
}

/// A single todo item, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for registering a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub username: String,
}

/// Request payload for creating a new todo. `done` is not accepted here:
/// a todo always starts pending.
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub deadline: String,
}

/// Request payload for updating an existing todo. Only the fields present
/// in the JSON are applied; omitted (or null) fields remain unchanged on
/// the stored record.
#[derive(Debug, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub deadline: Option<String>,
}

/// Parse a caller-supplied deadline.
///
/// Accepted forms, tried in order:
/// - RFC 3339: `2030-01-01T12:00:00Z` (any offset, normalized to UTC)
/// - bare date: `2030-01-01` (midnight UTC)
/// - naive datetime: `2030-01-01T12:00:00` (assumed UTC)
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.and_utc());
    }
    Err(ApiError::InvalidDeadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: Uuid::nil(),
            title: "Test".to_string(),
            done: false,
            deadline: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["done"], false);
        assert_eq!(json["deadline"], "2030-01-01T00:00:00Z");
        assert_eq!(json["created_at"], "2026-08-25T12:00:00Z");
    }

    #[test]
    fn user_serializes_with_todos_array() {
        let user = User {
            id: Uuid::nil(),
            name: "Ann".to_string(),
            username: "ann".to_string(),
            todos: Vec::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["username"], "ann");
        assert_eq!(json["todos"], serde_json::json!([]));
    }

    #[test]
    fn create_todo_requires_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"deadline":"2030-01-01"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_todo_requires_deadline() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"title":"No deadline"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.deadline.is_none());
    }

    #[test]
    fn update_todo_partial_fields() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":"New title"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("New title"));
        assert!(input.deadline.is_none());
    }

    #[test]
    fn update_todo_null_means_absent() {
        let input: UpdateTodo = serde_json::from_str(r#"{"title":null,"deadline":null}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.deadline.is_none());
    }

    #[test]
    fn parse_deadline_accepts_rfc3339() {
        let parsed = parse_deadline("2030-01-01T12:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn parse_deadline_normalizes_offsets_to_utc() {
        let parsed = parse_deadline("2030-01-01T12:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn parse_deadline_accepts_bare_date_as_midnight_utc() {
        let parsed = parse_deadline("2030-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_deadline_accepts_naive_datetime_as_utc() {
        let parsed = parse_deadline("2030-01-01T08:15:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 1, 8, 15, 0).unwrap());
    }

    #[test]
    fn parse_deadline_rejects_garbage() {
        assert!(matches!(
            parse_deadline("not-a-date"),
            Err(ApiError::InvalidDeadline)
        ));
        assert!(matches!(parse_deadline(""), Err(ApiError::InvalidDeadline)));
        assert!(matches!(
            parse_deadline("2030-13-40"),
            Err(ApiError::InvalidDeadline)
        ));
    }
}
