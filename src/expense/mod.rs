//! Expense management for the tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `ExpenseBuilder` with the write-time defaults
//! - Database functions for storing, querying, and deleting expenses
//! - The HTTP endpoints for listing, creating, deleting, statistics, and the
//!   monthly trend

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod stats_endpoint;
mod trend_endpoint;

pub use core::{DEFAULT_CATEGORY, Expense, ExpenseBuilder, create_expense_table, map_expense_row};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use list_endpoint::{DEFAULT_EXPENSE_LIMIT, list_expenses_endpoint};
pub use stats_endpoint::expense_stats_endpoint;
pub use trend_endpoint::expense_trend_endpoint;

pub(crate) use core::list_expenses;

#[cfg(test)]
pub(crate) use core::create_expense;
