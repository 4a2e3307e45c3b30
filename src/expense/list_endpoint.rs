//! Defines the endpoint for listing expenses with optional year/month filtering.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::filter_by_year_month,
    expense::core::list_expenses,
    timezone,
};

/// The cap on the number of records returned when the client does not give one.
pub const DEFAULT_EXPENSE_LIMIT: usize = 50;

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used for calendar boundaries.
    pub local_timezone: String,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for listing expenses.
///
/// All three are taken as raw strings: a non-numeric `year` or `month`
/// disables filtering and a non-numeric `limit` means the default cap, rather
/// than rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    /// The calendar year to filter by.
    #[serde(default)]
    pub year: Option<String>,
    /// The calendar month (1-12) to filter by. Only used together with `year`.
    #[serde(default)]
    pub month: Option<String>,
    /// The maximum number of records to return.
    #[serde(default)]
    pub limit: Option<String>,
}

/// A route handler for listing expenses, newest date first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Response, Error> {
    let offset = timezone::local_offset(&state.local_timezone)?;

    let year = query.year.and_then(|year| year.parse::<i32>().ok());
    let month = query.month.and_then(|month| month.parse::<u8>().ok());
    let limit = query
        .limit
        .and_then(|limit| limit.parse::<usize>().ok())
        .unwrap_or(DEFAULT_EXPENSE_LIMIT);

    let expenses = {
        let connection = state.db_connection.lock().unwrap();
        list_expenses(&connection)?
    };

    let filtered = filter_by_year_month(&expenses, year, month, limit, offset);

    Ok(Json(filtered).into_response())
}
