//! Defines the endpoint for listing todos.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, todo::core::list_todos};

/// The state needed to list todos.
#[derive(Debug, Clone)]
pub struct ListTodosState {
    /// The database connection for managing todos.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTodosState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing all todos, newest created first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_todos_endpoint(State(state): State<ListTodosState>) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();
    let todos = list_todos(&connection)?;

    Ok(Json(todos).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::to_bytes, extract::State};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        todo::{
            Todo,
            core::create_todo,
            list_endpoint::{ListTodosState, list_todos_endpoint},
        },
    };

    #[tokio::test]
    async fn lists_newest_first() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_todo(Todo::build("first"), &conn).unwrap();
        create_todo(Todo::build("second"), &conn).unwrap();
        let state = ListTodosState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = list_todos_endpoint(State(state)).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let todos: Vec<Todo> = serde_json::from_slice(&bytes).unwrap();
        let titles: Vec<&str> = todos.iter().map(|todo| todo.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }
}
