//! Defines the endpoint for the trailing monthly expense trend.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error, aggregation::monthly_trend, expense::core::list_expenses, timezone,
};

/// How many trailing months the trend covers when the client does not say.
pub const DEFAULT_TREND_MONTHS: usize = 6;

/// The most trailing months a single request may ask for.
pub const MAX_TREND_MONTHS: usize = 120;

/// The state needed to compute the expense trend.
#[derive(Debug, Clone)]
pub struct ExpenseTrendState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used for calendar boundaries.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpenseTrendState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the trend endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// How many trailing calendar months to include, current month last.
    #[serde(default)]
    pub months: Option<String>,
}

/// A route handler returning one `{label, total}` entry per trailing calendar
/// month, oldest first.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn expense_trend_endpoint(
    State(state): State<ExpenseTrendState>,
    Query(query): Query<TrendQuery>,
) -> Result<Response, Error> {
    let offset = timezone::local_offset(&state.local_timezone)?;

    let months = query
        .months
        .and_then(|months| months.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .min(MAX_TREND_MONTHS);

    let expenses = {
        let connection = state.db_connection.lock().unwrap();
        list_expenses(&connection)?
    };

    let trend = monthly_trend(&expenses, months, OffsetDateTime::now_utc(), offset);

    Ok(Json(trend).into_response())
}
