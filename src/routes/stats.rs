// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard statistics route.

use crate::error::Result;
use crate::models::DashboardStats;
use crate::routes::validated_query;
use crate::services::stats;
use crate::AppState;
use axum::extract::rejection::QueryRejection;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats/dashboard", get(get_dashboard_stats))
}

#[derive(Debug, Deserialize, Validate)]
pub struct DashboardQuery {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

/// Aggregate stats across all of a user's habits, archived included.
async fn get_dashboard_stats(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardStats>> {
    let params = validated_query(params)?;

    let habits = state.db.list_habits_for_user(&params.user_id, true).await?;
    let ids: Vec<String> = habits.iter().map(|h| h.id.clone()).collect();
    let completions = state.db.get_completions_for_habits(&ids).await?;

    let history: Vec<_> = habits
        .into_iter()
        .zip(completions)
        .map(|(habit, completions)| {
            let times: Vec<DateTime<Utc>> = completions.iter().map(|c| c.completed_at).collect();
            (habit, times)
        })
        .collect();

    let dashboard = stats::dashboard_stats(&history, Utc::now());

    tracing::debug!(
        user_id = %params.user_id,
        active_habits = dashboard.active_habits,
        completed_today = dashboard.completed_today,
        "Dashboard stats computed"
    );

    Ok(Json(dashboard))
}
