//! Defines the endpoint for partially updating a todo.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    database_id::TodoId,
    todo::core::{TodoUpdate, update_todo},
};

/// The state needed to update a todo.
#[derive(Debug, Clone)]
pub struct UpdateTodoState {
    /// The database connection for managing todos.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTodoState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for a partial todo update.
///
/// Absent fields are left untouched; there is no way to clear a field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoData {
    /// The new completion flag, if it should change.
    #[serde(default)]
    pub done: Option<bool>,
    /// The new title, if it should change.
    #[serde(default)]
    pub title: Option<String>,
}

/// A route handler for partially updating a todo, returning the updated
/// record, or a 404 if the ID does not exist.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_todo_endpoint(
    State(state): State<UpdateTodoState>,
    Path(todo_id): Path<TodoId>,
    payload: Result<Json<UpdateTodoData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(data) = payload.map_err(|rejection| Error::InvalidBody(rejection.body_text()))?;

    let update = TodoUpdate {
        done: data.done,
        title: data.title,
    };

    let connection = state.db_connection.lock().unwrap();
    let todo = update_todo(todo_id, update, &connection)?;

    Ok(Json(todo).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        body::to_bytes,
        extract::{Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        todo::{
            Todo,
            core::create_todo,
            update_endpoint::{UpdateTodoData, UpdateTodoState, update_todo_endpoint},
        },
    };

    fn get_test_state() -> UpdateTodoState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        UpdateTodoState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn marks_todo_done_without_touching_title() {
        let state = get_test_state();
        let todo = {
            let connection = state.db_connection.lock().unwrap();
            create_todo(Todo::build("water the plants"), &connection).unwrap()
        };

        let data = UpdateTodoData {
            done: Some(true),
            title: None,
        };
        let response = update_todo_endpoint(State(state), Path(todo.id), Ok(Json(data)))
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let updated: Todo = serde_json::from_slice(&bytes).unwrap();
        assert!(updated.done);
        assert_eq!(updated.title, "water the plants");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let state = get_test_state();

        let result = update_todo_endpoint(
            State(state),
            Path(42),
            Ok(Json(UpdateTodoData::default())),
        )
        .await;

        assert_eq!(result.unwrap_err(), Error::NotFound);
    }
}
