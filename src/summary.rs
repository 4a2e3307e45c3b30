//! Defines the endpoint for the combined daily summary.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, aggregation::today_summary, expense::list_expenses, timezone,
    todo::list_todos,
};

/// The state needed to compute the daily summary.
#[derive(Debug, Clone)]
pub struct TodaySummaryState {
    /// The database connection for reading expenses and todos.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used for calendar boundaries.
    pub local_timezone: String,
}

impl FromRef<AppState> for TodaySummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for the combined summary of the current local day: the
/// day's expenses with their total, and the global pending-todo count.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn today_summary_endpoint(
    State(state): State<TodaySummaryState>,
) -> Result<Response, Error> {
    let offset = timezone::local_offset(&state.local_timezone)?;

    let (expenses, todos) = {
        let connection = state.db_connection.lock().unwrap();
        (list_expenses(&connection)?, list_todos(&connection)?)
    };

    let summary = today_summary(&expenses, &todos, OffsetDateTime::now_utc(), offset);

    Ok(Json(summary).into_response())
}
