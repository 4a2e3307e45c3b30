//! Defines the endpoint for deleting a todo by ID.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, database_id::TodoId, todo::core::delete_todo};

/// The state needed to delete a todo.
#[derive(Debug, Clone)]
pub struct DeleteTodoState {
    /// The database connection for managing todos.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTodoState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a todo.
///
/// Responds with `{"success": true}` when a row was removed and a 404 when
/// the ID does not exist.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_todo_endpoint(
    State(state): State<DeleteTodoState>,
    Path(todo_id): Path<TodoId>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();

    match delete_todo(todo_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(Json(json!({ "success": true })).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        todo::{
            Todo,
            core::create_todo,
            delete_endpoint::{DeleteTodoState, delete_todo_endpoint},
        },
    };

    fn get_test_state() -> DeleteTodoState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        DeleteTodoState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn second_delete_of_same_id_is_not_found() {
        let state = get_test_state();
        let todo = {
            let connection = state.db_connection.lock().unwrap();
            create_todo(Todo::build("water the plants"), &connection).unwrap()
        };

        let first = delete_todo_endpoint(State(state.clone()), Path(todo.id)).await;
        let second = delete_todo_endpoint(State(state), Path(todo.id)).await;

        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), Error::NotFound);
    }
}
