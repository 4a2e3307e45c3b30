//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/todos/{todo_id}', tests
//! use `format_endpoint` to fill in the parameter.

/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to delete a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for today/this-month expense statistics.
pub const EXPENSE_STATS: &str = "/api/expenses/stats";
/// The route for the trailing monthly expense trend.
pub const EXPENSE_TREND: &str = "/api/expenses/trend";
/// The route to list and create todos.
pub const TODOS: &str = "/api/todos";
/// The route to update or delete a single todo.
pub const TODO: &str = "/api/todos/{todo_id}";
/// The route for the combined summary of the current day.
pub const TODAY_SUMMARY: &str = "/api/summary/today";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/todos/{todo_id}', '{todo_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_STATS);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_TREND);
        assert_endpoint_is_valid_uri(endpoints::TODOS);
        assert_endpoint_is_valid_uri(endpoints::TODO);
        assert_endpoint_is_valid_uri(endpoints::TODAY_SUMMARY);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/api/todos/{todo_id}", 1);

        assert_eq!(formatted_path, "/api/todos/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/api/todos", 1);

        assert_eq!(formatted_path, "/api/todos");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
