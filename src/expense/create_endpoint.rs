//! Defines the endpoint for creating a new expense.

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
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    expense::{Expense, core::create_expense},
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating an expense.
///
/// Everything except `amount` is optional; the defaults are documented on
/// [crate::expense::ExpenseBuilder].
#[derive(Debug, Deserialize)]
pub struct ExpenseData {
    /// The amount of money spent.
    ///
    /// Taken as a raw JSON value so that a wrong-typed amount gets the same
    /// error message as a missing one instead of a deserialization error.
    #[serde(default)]
    pub amount: Option<Value>,
    /// The category label for the expense.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text detail about the expense.
    #[serde(default)]
    pub note: Option<String>,
    /// When the money was spent, as an RFC 3339 timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// A route handler for creating a new expense, returning the created record
/// with a 201 status.
///
/// Responds with a 400 if the body is not valid JSON of the expected shape or
/// if `amount` is missing or not a number.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    payload: Result<Json<ExpenseData>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(data) = payload.map_err(|rejection| Error::InvalidBody(rejection.body_text()))?;

    let amount = data
        .amount
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or(Error::InvalidAmount)?;

    let builder = Expense::build(amount)
        .category(data.category)
        .note(data.note)
        .date(data.date);

    let connection = state.db_connection.lock().unwrap();
    let expense = create_expense(builder, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)).into_response())
}
