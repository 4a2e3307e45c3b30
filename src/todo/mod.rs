//! Todo management for the tracker.
//!
//! This module contains everything related to todos:
//! - The `Todo` model, `TodoBuilder`, and the partial-update type
//! - Database functions for storing, querying, updating, and deleting todos
//! - The HTTP endpoints for listing, creating, updating, and deleting

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use core::{Priority, Todo, TodoBuilder, TodoUpdate, create_todo_table, map_todo_row};
pub use create_endpoint::create_todo_endpoint;
pub use delete_endpoint::delete_todo_endpoint;
pub use list_endpoint::list_todos_endpoint;
pub use update_endpoint::update_todo_endpoint;

pub(crate) use core::list_todos;

#[cfg(test)]
pub(crate) use core::create_todo;
