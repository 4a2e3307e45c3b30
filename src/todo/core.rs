//! Defines the core data model and database queries for todos.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::TodoId,
    db::{datetime_from_unix_millis, to_unix_millis},
};

// ============================================================================
// MODELS
// ============================================================================

/// How urgent a todo is.
///
/// Advisory only: stored and echoed back, never used in any server-side
/// ordering or filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Needs attention soon.
    High,
    /// The default middle ground.
    Medium,
    /// Whenever there is time.
    Low,
}

impl Priority {
    fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            other => Err(FromSqlError::Other(
                format!("unknown priority {other:?}").into(),
            )),
        }
    }
}

/// A task: a title, a completion flag, and the instant it was created.
///
/// To create a new `Todo`, use [Todo::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// The ID of the todo.
    pub id: TodoId,
    /// What needs doing. Non-empty at creation.
    pub title: String,
    /// Whether the task is complete. Always false at creation.
    pub done: bool,
    /// When the todo was created. Set once, never updated.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Optional advisory classification, e.g. "Professional" or "Personal".
    pub category: Option<String>,
    /// Optional advisory priority.
    pub priority: Option<Priority>,
}

impl Todo {
    /// Start building a new todo.
    ///
    /// Shortcut for [TodoBuilder] for discoverability.
    pub fn build(title: &str) -> TodoBuilder {
        TodoBuilder {
            title: title.to_owned(),
            category: None,
            priority: None,
        }
    }
}

/// A builder for creating [Todo] records with the documented defaults.
///
/// Defaults applied in [create_todo]: `done` is false and `created_at` is the
/// creation instant. The caller is responsible for rejecting empty titles
/// before building.
#[derive(Debug, PartialEq, Clone)]
pub struct TodoBuilder {
    /// What needs doing.
    pub title: String,
    /// Optional advisory classification.
    pub category: Option<String>,
    /// Optional advisory priority.
    pub priority: Option<Priority>,
}

impl TodoBuilder {
    /// Set the advisory category for the todo.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the advisory priority for the todo.
    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }
}

/// The fields of a todo that a partial update may change.
///
/// A `None` field is left untouched; updating with both fields `None` is a
/// no-op that still reports whether the ID exists.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct TodoUpdate {
    /// The new completion flag, if it should change.
    pub done: Option<bool>,
    /// The new title, if it should change.
    pub title: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new todo in the database, not done, created now.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_todo(builder: TodoBuilder, connection: &Connection) -> Result<Todo, Error> {
    let created_at = to_unix_millis(OffsetDateTime::now_utc());

    let todo = connection
        .prepare(
            "INSERT INTO todo (title, done, created_at, category, priority)
             VALUES (?1, 0, ?2, ?3, ?4)
             RETURNING id, title, done, created_at, category, priority",
        )?
        .query_row(
            (builder.title, created_at, builder.category, builder.priority),
            map_todo_row,
        )?;

    Ok(todo)
}

/// Retrieve all todos ordered by creation time, newest first.
///
/// The secondary sort on ID keeps the order stable between queries but is not
/// part of the public contract.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_todos(connection: &Connection) -> Result<Vec<Todo>, Error> {
    connection
        .prepare(
            "SELECT id, title, done, created_at, category, priority FROM todo
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_todo_row)?
        .map(|todo_result| todo_result.map_err(Error::SqlError))
        .collect()
}

/// Apply a partial update to a todo and return the updated record.
///
/// Fields left `None` in `update` keep their stored value.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid todo,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_todo(id: TodoId, update: TodoUpdate, connection: &Connection) -> Result<Todo, Error> {
    let todo = connection
        .prepare(
            "UPDATE todo
             SET done = COALESCE(?1, done), title = COALESCE(?2, title)
             WHERE id = ?3
             RETURNING id, title, done, created_at, category, priority",
        )?
        .query_row((update.done, update.title, id), map_todo_row)?;

    Ok(todo)
}

/// The number of rows removed by a delete statement.
pub type RowsAffected = usize;

/// Delete a todo by its `id`, returning how many rows were removed.
///
/// Deleting an ID that does not exist is not an error here; it returns 0 and
/// the caller decides how to report it.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_todo(id: TodoId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM todo WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Create the todo table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_todo_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS todo (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                done INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                category TEXT,
                priority TEXT
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('todo', 0)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Todo.
pub fn map_todo_row(row: &Row) -> Result<Todo, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let done = row.get(2)?;
    let created_at = datetime_from_unix_millis(row.get(3)?, 3)?;
    let category = row.get(4)?;
    let priority = row.get(5)?;

    Ok(Todo {
        id,
        title,
        done,
        created_at,
        category,
        priority,
    })
}

// ============================================================================
// TESTS
// ============================================================================
