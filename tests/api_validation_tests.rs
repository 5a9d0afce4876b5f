// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! All of these are rejected before the database is touched, so they run
//! against the offline test app.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn violated_fields(body: &Value) -> Vec<String> {
    body["violations"]
        .as_array()
        .map(|violations| {
            violations
                .iter()
                .filter_map(|v| v["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

async fn expect_violation(request: Request<Body>, field: &str) {
    let (app, _state) = common::create_test_app();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::json_body(response).await;
    assert_eq!(body["error"], "validation_failed");
    assert!(
        violated_fields(&body).iter().any(|f| f == field),
        "expected violation on {}, got {}",
        field,
        body
    );
}

// ─── Habits ──────────────────────────────────────────────────

#[tokio::test]
async fn test_habit_name_too_long() {
    let long_name = "a".repeat(101);

    expect_violation(
        json_request(
            "POST",
            "/api/habits",
            json!({ "user_id": "user-1", "name": long_name }),
        ),
        "name",
    )
    .await;
}

#[tokio::test]
async fn test_habit_name_empty() {
    expect_violation(
        json_request("POST", "/api/habits", json!({ "user_id": "user-1", "name": "" })),
        "name",
    )
    .await;
}

#[tokio::test]
async fn test_habit_description_too_long() {
    expect_violation(
        json_request(
            "POST",
            "/api/habits",
            json!({ "user_id": "user-1", "name": "Read", "description": "d".repeat(501) }),
        ),
        "description",
    )
    .await;
}

#[tokio::test]
async fn test_habit_zero_target_count() {
    expect_violation(
        json_request(
            "POST",
            "/api/habits",
            json!({
                "user_id": "user-1",
                "name": "Gym",
                "frequency": "CUSTOM",
                "target_count": 0,
                "target_period": "WEEK"
            }),
        ),
        "target_count",
    )
    .await;
}

#[tokio::test]
async fn test_habit_unknown_frequency() {
    expect_violation(
        json_request(
            "POST",
            "/api/habits",
            json!({ "user_id": "user-1", "name": "Gym", "frequency": "HOURLY" }),
        ),
        "body",
    )
    .await;
}

#[tokio::test]
async fn test_habit_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/habits")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user_id\": \"user-1\", \"name\":"))
        .unwrap();

    expect_violation(request, "body").await;
}

#[tokio::test]
async fn test_habit_update_rejects_long_name() {
    expect_violation(
        json_request(
            "PUT",
            "/api/habits/some-habit",
            json!({ "name": "x".repeat(101) }),
        ),
        "name",
    )
    .await;
}

#[tokio::test]
async fn test_list_habits_requires_user_id() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/habits")
        .body(Body::empty())
        .unwrap();

    expect_violation(request, "query").await;
}

#[tokio::test]
async fn test_list_habits_user_id_too_long() {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/habits?user_id={}", "u".repeat(129)))
        .body(Body::empty())
        .unwrap();

    expect_violation(request, "user_id").await;
}

// ─── Completions ─────────────────────────────────────────────

#[tokio::test]
async fn test_completion_invalid_timestamp() {
    expect_violation(
        json_request(
            "POST",
            "/api/completions",
            json!({ "habit_id": "h1", "completed_at": "yesterday" }),
        ),
        "completed_at",
    )
    .await;
}

#[tokio::test]
async fn test_completion_note_too_long() {
    expect_violation(
        json_request(
            "POST",
            "/api/completions",
            json!({ "habit_id": "h1", "note": "n".repeat(501) }),
        ),
        "note",
    )
    .await;
}

#[tokio::test]
async fn test_delete_completions_invalid_date() {
    expect_violation(
        json_request(
            "DELETE",
            "/api/completions",
            json!({ "habit_id": "h1", "date": "15/03/2024" }),
        ),
        "date",
    )
    .await;
}

// ─── Categories & AI ─────────────────────────────────────────

#[tokio::test]
async fn test_category_name_too_long() {
    expect_violation(
        json_request(
            "POST",
            "/api/categories",
            json!({ "user_id": "user-1", "name": "c".repeat(51) }),
        ),
        "name",
    )
    .await;
}

#[tokio::test]
async fn test_affirmation_context_too_long() {
    expect_violation(
        json_request(
            "POST",
            "/api/ai/affirmation",
            json!({ "context": "c".repeat(501) }),
        ),
        "context",
    )
    .await;
}

#[tokio::test]
async fn test_suggest_category_requires_habit_name() {
    expect_violation(
        json_request("POST", "/api/ai/suggest-category", json!({})),
        "body",
    )
    .await;
}
