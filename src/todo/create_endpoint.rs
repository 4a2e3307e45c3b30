//! Defines the endpoint for creating a new todo.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState, Error,
    todo::{Priority, Todo, core::create_todo},
};

/// The state needed to create a todo.
#[derive(Debug, Clone)]
pub struct CreateTodoState {
    /// The database connection for managing todos.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTodoState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a todo.
#[derive(Debug, Deserialize)]
pub struct TodoData {
    /// What needs doing. Required and non-empty.
    ///
    /// Taken as a raw JSON value so that a wrong-typed title gets the same
    /// error message as a missing one instead of a deserialization error.
    #[serde(default)]
    pub title: Option<Value>,
    /// Optional advisory classification.
    #[serde(default)]
    pub category: Option<String>,
    /// Optional advisory priority.
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// A route handler for creating a new todo, returning the created record with
/// a 201 status. The record always starts with `done` false.
///
/// Responds with a 400 if the body is not valid JSON of the expected shape or
/// if `title` is missing, empty, or not a string.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_todo_endpoint(
    State(state): State<CreateTodoState>,
    payload: Result<Json<TodoData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(data) = payload.map_err(|rejection| Error::InvalidBody(rejection.body_text()))?;

    let title = match data.title {
        Some(Value::String(title)) if !title.is_empty() => title,
        _ => return Err(Error::MissingTitle),
    };

    let builder = Todo::build(&title)
        .category(data.category)
        .priority(data.priority);

    let connection = state.db_connection.lock().unwrap();
    let todo = create_todo(builder, &connection)?;

    Ok((StatusCode::CREATED, Json(todo)).into_response())
}
