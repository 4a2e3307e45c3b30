//! Database initialization and shared row-mapping helpers.

use rusqlite::{Connection, Transaction as SqlTransaction};
use time::OffsetDateTime;

use crate::{Error, expense::create_expense_table, todo::create_todo_table};

/// Create the application tables if they do not already exist.
///
/// The tables are created inside an exclusive transaction so that a partially
/// initialized schema is never left behind.
///
/// # Errors
/// Returns an error if a table cannot be created or there is some other SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_expense_table(&transaction)?;
    create_todo_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Convert a date-time to the unix-epoch milliseconds stored in the database.
pub(crate) fn to_unix_millis(datetime: OffsetDateTime) -> i64 {
    (datetime.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Convert unix-epoch milliseconds read from `column` back into a date-time.
///
/// The result is always in UTC; callers convert to the local offset when
/// bucketing by calendar day or month.
pub(crate) fn datetime_from_unix_millis(
    millis: i64,
    column: usize,
) -> Result<OffsetDateTime, rusqlite::Error> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Integer,
            Box::new(error),
        )
    })
}
