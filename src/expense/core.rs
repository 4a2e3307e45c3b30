//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    database_id::ExpenseId,
    db::{datetime_from_unix_millis, to_unix_millis},
};

/// The category label given to expenses created without one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

// ============================================================================
// MODEL
// ============================================================================

/// A single monetary outlay: an amount, a category label, an optional note,
/// and the timestamp when the money was spent.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// The amount of money spent. Always a finite number.
    pub amount: f64,
    /// The category label, exactly as stored. Never empty: expenses created
    /// without a category get [DEFAULT_CATEGORY] at write time.
    pub category: String,
    /// Free-text detail about the expense.
    pub note: Option<String>,
    /// When the money was spent.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Expense {
    /// Start building a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(amount: f64) -> ExpenseBuilder {
        ExpenseBuilder {
            amount,
            category: None,
            note: None,
            date: None,
        }
    }
}

/// A builder for creating [Expense] records with the documented defaults.
///
/// The defaults are applied in [create_expense], at write time: a missing or
/// empty category becomes [DEFAULT_CATEGORY], a missing note stays null, and
/// a missing date becomes the creation instant. Every entry point that
/// creates expenses goes through this builder so the defaults cannot drift.
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseBuilder {
    /// The amount of money spent.
    pub amount: f64,
    /// The category label, if one was given.
    pub category: Option<String>,
    /// Free-text detail, if any was given.
    pub note: Option<String>,
    /// When the money was spent, if specified.
    pub date: Option<OffsetDateTime>,
}

impl ExpenseBuilder {
    /// Set the category label for the expense.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the note for the expense.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Set the date for the expense.
    pub fn date(mut self, date: Option<OffsetDateTime>) -> Self {
        self.date = date;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new expense in the database from a builder, applying the default
/// category, note, and date.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    let category = match builder.category {
        Some(category) if !category.is_empty() => category,
        _ => DEFAULT_CATEGORY.to_owned(),
    };
    let date = builder.date.unwrap_or_else(OffsetDateTime::now_utc);

    let expense = connection
        .prepare(
            "INSERT INTO expense (amount, category, note, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, category, note, date",
        )?
        .query_row(
            (builder.amount, category, builder.note, to_unix_millis(date)),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve all expenses ordered by date, newest first.
///
/// The secondary sort on ID keeps the order stable between queries but is not
/// part of the public contract.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn list_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare("SELECT id, amount, category, note, date FROM expense ORDER BY date DESC, id DESC")?
        .query_map([], map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}

/// The number of rows removed by a delete statement.
pub type RowsAffected = usize;

/// Delete an expense by its `id`, returning how many rows were removed.
///
/// Deleting an ID that does not exist is not an error here; it returns 0 and
/// the caller decides how to report it.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                note TEXT,
                date INTEGER NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expense', 0)",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category = row.get(2)?;
    let note = row.get(3)?;
    let date = datetime_from_unix_millis(row.get(4)?, 4)?;

    Ok(Expense {
        id,
        amount,
        category,
        note,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::datetime};

    use crate::{
        db::initialize,
        expense::{
            DEFAULT_CATEGORY, Expense, create_expense,
            core::{delete_expense, list_expenses},
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_echoes_input_fields() {
        let conn = get_test_connection();
        let date = datetime!(2024-03-01 00:00 UTC);

        let expense = create_expense(
            Expense::build(42.5)
                .category(Some("Food".to_owned()))
                .note(Some("lunch".to_owned()))
                .date(Some(date)),
            &conn,
        )
        .unwrap();

        assert_eq!(expense.id, 1);
        assert_eq!(expense.amount, 42.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.note, Some("lunch".to_owned()));
        assert_eq!(expense.date, date);
    }

    #[test]
    fn create_defaults_missing_category_and_note() {
        let conn = get_test_connection();

        let expense = create_expense(Expense::build(1.0), &conn).unwrap();

        assert_eq!(expense.category, DEFAULT_CATEGORY);
        assert_eq!(expense.note, None);
    }

    #[test]
    fn create_defaults_empty_category() {
        let conn = get_test_connection();

        let expense =
            create_expense(Expense::build(1.0).category(Some(String::new())), &conn).unwrap();

        assert_eq!(expense.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn create_defaults_date_to_now() {
        let conn = get_test_connection();
        let before = OffsetDateTime::now_utc();

        let expense = create_expense(Expense::build(1.0), &conn).unwrap();

        let after = OffsetDateTime::now_utc();
        assert!(expense.date >= before - time::Duration::milliseconds(1));
        assert!(expense.date <= after);
    }

    #[test]
    fn list_orders_newest_date_first() {
        let conn = get_test_connection();
        create_expense(
            Expense::build(1.0).date(Some(datetime!(2024-01-01 12:00 UTC))),
            &conn,
        )
        .unwrap();
        create_expense(
            Expense::build(2.0).date(Some(datetime!(2024-03-01 12:00 UTC))),
            &conn,
        )
        .unwrap();
        create_expense(
            Expense::build(3.0).date(Some(datetime!(2024-02-01 12:00 UTC))),
            &conn,
        )
        .unwrap();

        let expenses = list_expenses(&conn).unwrap();

        let amounts: Vec<f64> = expenses.iter().map(|expense| expense.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn delete_removes_the_row() {
        let conn = get_test_connection();
        let expense = create_expense(Expense::build(1.0), &conn).unwrap();

        let rows_affected = delete_expense(expense.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert!(list_expenses(&conn).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_id_affects_no_rows() {
        let conn = get_test_connection();

        let rows_affected = delete_expense(1337, &conn).unwrap();

        assert_eq!(rows_affected, 0);
    }
}
