//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};

use crate::{
    AppState, Error, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, expense_stats_endpoint,
        expense_trend_endpoint, list_expenses_endpoint,
    },
    summary::today_summary_endpoint,
    todo::{create_todo_endpoint, delete_todo_endpoint, list_todos_endpoint, update_todo_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_STATS, get(expense_stats_endpoint))
        .route(endpoints::EXPENSE_TREND, get(expense_trend_endpoint))
        .route(endpoints::EXPENSE, delete(delete_expense_endpoint))
        .route(
            endpoints::TODOS,
            get(list_todos_endpoint).post(create_todo_endpoint),
        )
        .route(
            endpoints::TODO,
            put(update_todo_endpoint).delete(delete_todo_endpoint),
        )
        .route(endpoints::TODAY_SUMMARY, get(today_summary_endpoint))
        .fallback(get_unknown_route)
        .with_state(state)
}

/// Unknown routes get the same JSON not-found body as missing records.
async fn get_unknown_route() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod api_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, build_router,
        endpoints::{self, format_endpoint},
        expense::Expense,
        todo::Todo,
    };

    fn create_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "UTC").expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn create_expense_echoes_fields() {
        let server = create_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({
                "amount": 42.5,
                "category": "Food",
                "note": "lunch",
                "date": "2024-03-01T12:00:00Z"
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let expense = response.json::<Expense>();
        assert_eq!(expense.amount, 42.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.note, Some("lunch".to_owned()));
    }

    #[tokio::test]
    async fn create_expense_defaults_category_and_note() {
        let server = create_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "amount": 1.0 }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let expense = response.json::<Expense>();
        assert_eq!(expense.category, "uncategorized");
        assert_eq!(expense.note, None);
    }

    #[tokio::test]
    async fn create_expense_rejects_non_numeric_amount() {
        let server = create_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "amount": "lots" }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"], "amount must be a number");
    }

    #[tokio::test]
    async fn create_expense_rejects_missing_amount() {
        let server = create_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "category": "Food" }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"], "amount must be a number");
    }

    #[tokio::test]
    async fn delete_expense_succeeds_once_then_404s() {
        let server = create_test_server();
        let expense = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "amount": 5.0 }))
            .await
            .json::<Expense>();
        let path = format_endpoint(endpoints::EXPENSE, expense.id);

        let first = server.delete(&path).await;
        first.assert_status_ok();
        assert_eq!(first.json::<Value>()["success"], true);

        let second = server.delete(&path).await;
        second.assert_status_not_found();
        assert_eq!(second.json::<Value>()["error"], "not found");
    }

    #[tokio::test]
    async fn deleted_expense_no_longer_listed() {
        let server = create_test_server();
        let expense = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "amount": 5.0 }))
            .await
            .json::<Expense>();

        server
            .delete(&format_endpoint(endpoints::EXPENSE, expense.id))
            .await
            .assert_status_ok();

        let expenses = server.get(endpoints::EXPENSES).await.json::<Vec<Expense>>();
        assert!(expenses.is_empty());
    }

    #[tokio::test]
    async fn list_expenses_filters_by_year_and_month() {
        let server = create_test_server();
        for (amount, date) in [
            (1.0, "2024-02-28T23:59:59.999Z"),
            (2.0, "2024-03-01T00:00:00Z"),
            (3.0, "2024-03-31T23:59:59.999Z"),
            (4.0, "2024-04-01T00:00:00Z"),
        ] {
            server
                .post(endpoints::EXPENSES)
                .json(&json!({ "amount": amount, "date": date }))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("year", "2024")
            .add_query_param("month", "3")
            .await;

        let expenses = response.json::<Vec<Expense>>();
        let amounts: Vec<f64> = expenses.iter().map(|expense| expense.amount).collect();
        // Newest date first within the month.
        assert_eq!(amounts, vec![3.0, 2.0]);
    }

    #[tokio::test]
    async fn expense_stats_reports_both_windows() {
        let server = create_test_server();
        server
            .post(endpoints::EXPENSES)
            .json(&json!({ "amount": 10.0, "category": "Food" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let body = server.get(endpoints::EXPENSE_STATS).await.json::<Value>();

        assert_eq!(body["today"]["total"], 10.0);
        assert_eq!(body["today"]["count"], 1);
        assert_eq!(body["today"]["byCategory"]["Food"], 10.0);
        assert_eq!(body["thisMonth"]["count"], 1);
    }

    #[tokio::test]
    async fn expense_trend_has_six_entries_by_default() {
        let server = create_test_server();

        let body = server.get(endpoints::EXPENSE_TREND).await.json::<Value>();

        assert_eq!(body.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn create_todo_starts_not_done() {
        let server = create_test_server();

        let response = server
            .post(endpoints::TODOS)
            .json(&json!({ "title": "water the plants" }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let todo = response.json::<Todo>();
        assert_eq!(todo.title, "water the plants");
        assert!(!todo.done);
    }

    #[tokio::test]
    async fn create_todo_rejects_missing_title() {
        let server = create_test_server();

        let response = server.post(endpoints::TODOS).json(&json!({})).await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"], "title is required");
    }

    #[tokio::test]
    async fn create_todo_rejects_non_string_title() {
        let server = create_test_server();

        let response = server
            .post(endpoints::TODOS)
            .json(&json!({ "title": 7 }))
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["error"], "title is required");
    }

    #[tokio::test]
    async fn update_todo_is_partial() {
        let server = create_test_server();
        let todo = server
            .post(endpoints::TODOS)
            .json(&json!({ "title": "water the plants" }))
            .await
            .json::<Todo>();
        let path = format_endpoint(endpoints::TODO, todo.id);

        let updated = server
            .put(&path)
            .json(&json!({ "done": true }))
            .await
            .json::<Todo>();
        assert!(updated.done);
        assert_eq!(updated.title, "water the plants");

        let updated = server
            .put(&path)
            .json(&json!({ "title": "water the garden" }))
            .await
            .json::<Todo>();
        assert!(updated.done);
        assert_eq!(updated.title, "water the garden");
    }

    #[tokio::test]
    async fn update_unknown_todo_is_not_found() {
        let server = create_test_server();

        let response = server
            .put(&format_endpoint(endpoints::TODO, 42))
            .json(&json!({ "done": true }))
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_todo_succeeds_once_then_404s() {
        let server = create_test_server();
        let todo = server
            .post(endpoints::TODOS)
            .json(&json!({ "title": "water the plants" }))
            .await
            .json::<Todo>();
        let path = format_endpoint(endpoints::TODO, todo.id);

        server.delete(&path).await.assert_status_ok();
        server.delete(&path).await.assert_status_not_found();
    }

    #[tokio::test]
    async fn list_todos_newest_first() {
        let server = create_test_server();
        for title in ["first", "second", "third"] {
            server
                .post(endpoints::TODOS)
                .json(&json!({ "title": title }))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let todos = server.get(endpoints::TODOS).await.json::<Vec<Todo>>();

        let titles: Vec<&str> = todos.iter().map(|todo| todo.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn today_summary_combines_expenses_and_todos() {
        let server = create_test_server();
        server
            .post(endpoints::EXPENSES)
            .json(&json!({ "amount": 12.5, "category": "Food" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
        server
            .post(endpoints::TODOS)
            .json(&json!({ "title": "pending" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let body = server.get(endpoints::TODAY_SUMMARY).await.json::<Value>();

        assert_eq!(body["totalExpenses"], 12.5);
        assert_eq!(body["expenses"].as_array().unwrap().len(), 1);
        assert_eq!(body["pendingTodos"], 1);
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let server = create_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"], "not found");
    }
}
