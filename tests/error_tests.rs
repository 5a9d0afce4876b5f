// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use habit_tracker::error::{AppError, FieldViolation};
use habit_tracker::services::StreakError;
use validator::Validate;

mod common;

#[derive(Validate)]
struct Sample {
    #[validate(length(min = 1, max = 5))]
    name: String,
    #[validate(range(min = 1))]
    count: u32,
}

#[test]
fn test_validation_errors_become_sorted_violations() {
    let sample = Sample {
        name: "too long".to_string(),
        count: 0,
    };
    let err: AppError = sample.validate().unwrap_err().into();

    match err {
        AppError::Validation(violations) => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert_eq!(fields, vec!["count", "name"]);
            assert!(violations.iter().all(|v| !v.message.is_empty()));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_streak_error_maps_to_target_count() {
    let err: AppError = StreakError::InvalidTargetCount(0).into();

    match err {
        AppError::Validation(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].field, "target_count");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_status_codes() {
    let cases = [
        (
            AppError::Validation(vec![FieldViolation::new("name", "too long")]),
            StatusCode::BAD_REQUEST,
            "validation_failed",
        ),
        (
            AppError::NotFound("Habit h1 not found".to_string()),
            StatusCode::NOT_FOUND,
            "not_found",
        ),
        (
            AppError::BadRequest("nope".to_string()),
            StatusCode::BAD_REQUEST,
            "bad_request",
        ),
        (
            AppError::Database("connection reset".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "database_error",
        ),
        (
            AppError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
        ),
    ];

    for (err, status, code) in cases {
        let response = err.into_response();
        assert_eq!(response.status(), status);

        let body = common::json_body(response).await;
        assert_eq!(body["error"], code);
    }
}

#[tokio::test]
async fn test_not_found_is_distinct_from_validation() {
    let response = AppError::NotFound("Habit h1 not found".to_string()).into_response();
    let body = common::json_body(response).await;

    assert_eq!(body["details"], "Habit h1 not found");
    assert!(body.get("violations").is_none());
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let response = AppError::Internal(anyhow::anyhow!("secret stack detail")).into_response();
    let body = common::json_body(response).await;

    assert!(!body.to_string().contains("secret stack detail"));
}
