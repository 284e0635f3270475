//! End-to-end API tests.
//!
//! Each test drives the real router over an in-memory SQLite store, so the
//! full request path is exercised: validation, evaluation, persistence, and
//! JSON response shaping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use abacus::config::AppConfig;
use abacus::history::SqliteHistory;
use abacus::routes::create_router;
use abacus::state::AppState;

async fn test_app() -> Router {
    let store = SqliteHistory::open_in_memory()
        .await
        .expect("in-memory store");
    let state = AppState::new(AppConfig::default(), Arc::new(store));
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

async fn calculate(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/calculate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

async fn get_history(app: &Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/api/history")
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

async fn clear_history(app: &Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/history")
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

#[tokio::test]
async fn calculate_add_and_read_back_history() {
    let app = test_app().await;

    let (status, body) = calculate(&app, json!({"operation": "add", "num1": 2, "num2": 3})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 5.0}));

    let (status, body) = get_history(&app).await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry["num1"], json!(2.0));
    assert_eq!(entry["num2"], json!(3.0));
    assert_eq!(entry["operation"], json!("add"));
    assert_eq!(entry["result"], json!(5.0));
    assert_eq!(entry["expression"], json!("2.0 + 3.0 = 5.0"));
    assert!(entry["id"].as_i64().expect("id") > 0);
    // ISO-8601 timestamp
    assert!(entry["timestamp"].as_str().expect("timestamp").contains('T'));
}

#[tokio::test]
async fn calculate_all_operations() {
    let app = test_app().await;

    let cases = [
        ("subtract", 10.0, 4.0, 6.0),
        ("multiply", 2.5, 4.0, 10.0),
        ("divide", 9.0, 2.0, 4.5),
    ];

    for (operation, num1, num2, expected) in cases {
        let (status, body) =
            calculate(&app, json!({"operation": operation, "num1": num1, "num2": num2})).await;
        assert_eq!(status, StatusCode::OK, "operation {operation}");
        assert_eq!(body["result"], json!(expected), "operation {operation}");
    }
}

#[tokio::test]
async fn numeric_string_operands_are_coerced() {
    let app = test_app().await;

    let (status, body) =
        calculate(&app, json!({"operation": "add", "num1": "2", "num2": "3.5"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!(5.5));
}

#[tokio::test]
async fn divide_by_zero_is_rejected_and_not_persisted() {
    let app = test_app().await;

    let (status, body) =
        calculate(&app, json!({"operation": "divide", "num1": 1, "num2": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Division by zero is not allowed"}));

    let (_, history) = get_history(&app).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let app = test_app().await;

    let (status, body) =
        calculate(&app, json!({"operation": "modulo", "num1": 1, "num2": 2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid operation"}));
}

#[tokio::test]
async fn missing_operation_is_rejected() {
    let app = test_app().await;

    let (status, body) = calculate(&app, json!({"num1": 1, "num2": 2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid operation"}));
}

#[tokio::test]
async fn bad_operands_are_rejected() {
    let app = test_app().await;

    let (status, body) =
        calculate(&app, json!({"operation": "add", "num1": "abc", "num2": 2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid number format"}));

    // Missing operands are rejected, not coerced to zero.
    let (status, body) = calculate(&app, json!({"operation": "add", "num1": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid number format"}));

    // Operand validation wins over operation validation.
    let (status, body) =
        calculate(&app, json!({"operation": "modulo", "num1": "abc", "num2": 2})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid number format"}));
}

#[tokio::test]
async fn history_is_newest_first_and_windowed() {
    let app = test_app().await;

    for i in 1..=25 {
        let (status, _) =
            calculate(&app, json!({"operation": "add", "num1": i, "num2": 0})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_history(&app).await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 20);

    // Most recent calculation first, ids strictly decreasing down the page.
    assert_eq!(entries[0]["num1"], json!(25.0));
    assert_eq!(entries[19]["num1"], json!(6.0));
    for pair in entries.windows(2) {
        assert!(pair[0]["id"].as_i64().expect("id") > pair[1]["id"].as_i64().expect("id"));
    }
}

#[tokio::test]
async fn clear_history_empties_the_log() {
    let app = test_app().await;

    for _ in 0..3 {
        calculate(&app, json!({"operation": "add", "num1": 1, "num2": 1})).await;
    }

    let (status, body) = clear_history(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "History cleared successfully"}));

    let (_, history) = get_history(&app).await;
    assert_eq!(history, json!([]));

    // Clearing an already-empty history is fine.
    let (status, body) = clear_history(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "History cleared successfully"}));
}

#[tokio::test]
async fn health_reports_running() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "Calculator API is running"}));
}

#[tokio::test]
async fn api_responses_are_not_cacheable() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/api/history")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("request");

    assert_eq!(
        response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = test_app().await;

    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("request");

    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
