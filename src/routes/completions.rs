// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion routes: mark a habit done, or undo a day.

use crate::error::{AppError, Result};
use crate::models::{Completion, CompletionResponse};
use crate::routes::{require_habit, validated_json};
use crate::time_utils::{day_bounds, parse_calendar_date, parse_utc_rfc3339};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/completions",
        post(create_completion).delete(delete_completions),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompletionRequest {
    #[validate(length(min = 1))]
    pub habit_id: String,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    /// RFC3339 timestamp; defaults to now
    pub completed_at: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteCompletionsRequest {
    #[validate(length(min = 1))]
    pub habit_id: String,
    /// Calendar day (`YYYY-MM-DD`, UTC) to clear
    pub date: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteCompletionsResponse {
    pub message: String,
    pub count: usize,
}

async fn create_completion(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateCompletionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompletionResponse>)> {
    let req = validated_json(payload)?;

    let completed_at = match req.completed_at.as_deref() {
        Some(raw) => parse_utc_rfc3339(raw).ok_or_else(|| {
            AppError::invalid_field("completed_at", "must be an RFC3339 timestamp")
        })?,
        None => Utc::now(),
    };

    require_habit(&state, &req.habit_id).await?;

    let completion = Completion {
        id: uuid::Uuid::new_v4().to_string(),
        habit_id: req.habit_id,
        completed_at,
        note: req.note,
    };

    state.db.insert_completion(&completion).await?;

    tracing::info!(
        habit_id = %completion.habit_id,
        completion_id = %completion.id,
        "Completion recorded"
    );

    Ok((StatusCode::CREATED, Json(completion.into())))
}

/// Remove every completion of a habit on one UTC calendar day.
async fn delete_completions(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DeleteCompletionsRequest>, JsonRejection>,
) -> Result<Json<DeleteCompletionsResponse>> {
    let req = validated_json(payload)?;

    let date = parse_calendar_date(&req.date)
        .ok_or_else(|| AppError::invalid_field("date", "must be a date in YYYY-MM-DD format"))?;

    require_habit(&state, &req.habit_id).await?;

    let (start, end) = day_bounds(date);
    let count = state
        .db
        .delete_completions_in_range(&req.habit_id, start, end)
        .await?;

    tracing::info!(habit_id = %req.habit_id, date = %date, count, "Completions removed");

    Ok(Json(DeleteCompletionsResponse {
        message: format!("Deleted {} completion(s)", count),
        count,
    }))
}
