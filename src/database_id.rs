//! Database ID type definitions.

/// The ID of an expense record.
pub type ExpenseId = i64;
/// The ID of a todo record.
pub type TodoId = i64;
