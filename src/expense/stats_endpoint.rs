//! Defines the endpoint for today/this-month expense statistics.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    aggregation::{ExpenseAggregate, daily_total, month_range, range_total},
    expense::core::list_expenses,
    timezone,
};

/// The state needed to compute expense statistics.
#[derive(Debug, Clone)]
pub struct ExpenseStatsState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used for calendar boundaries.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpenseStatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Aggregates for the local day and local calendar month containing now.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStats {
    /// Totals for the current day.
    pub today: ExpenseAggregate,
    /// Totals for the current calendar month.
    pub this_month: ExpenseAggregate,
}

/// A route handler for expense statistics over the current day and month.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn expense_stats_endpoint(
    State(state): State<ExpenseStatsState>,
) -> Result<Response, Error> {
    let offset = timezone::local_offset(&state.local_timezone)?;
    let local_now = OffsetDateTime::now_utc().to_offset(offset);

    let expenses = {
        let connection = state.db_connection.lock().unwrap();
        list_expenses(&connection)?
    };

    let today = daily_total(&expenses, local_now.date(), offset);

    let this_month = month_range(local_now.year(), local_now.month(), offset)
        .map(|range| range_total(&expenses, &range))
        .expect("the current month is always a representable range");

    Ok(Json(ExpenseStats { today, this_month }).into_response())
}
