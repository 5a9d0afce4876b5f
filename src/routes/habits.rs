// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Habit CRUD routes.

use crate::error::{AppError, Result};
use crate::models::category::builtin_category;
use crate::models::habit::{DEFAULT_COLOR, DEFAULT_ICON};
use crate::models::{
    Category, Completion, CompletionResponse, Frequency, Habit, HabitResponse, HabitStats, Period,
    StreakInfo,
};
use crate::routes::categories::ensure_category;
use crate::routes::{require_habit, validated_json, validated_query, DeleteResponse};
use crate::services::stats;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError};

/// Completions included in the habit detail view.
const RECENT_COMPLETIONS_LIMIT: usize = 90;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/habits", get(list_habits).post(create_habit))
        .route(
            "/api/habits/{id}",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
        .route("/api/habits/{id}/stats", get(get_habit_stats))
}

// ─── Request Types ───────────────────────────────────────────

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

fn default_target_count() -> u32 {
    1
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn deserialize_nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListHabitsQuery {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub category_id: Option<String>,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_target_count")]
    #[validate(range(min = 1, max = 1000))]
    pub target_count: u32,
    #[serde(default)]
    pub target_period: Period,
}

/// Partial update. Absent fields are left unchanged; `null` clears
/// `description` or `category_id`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(length(max = 500))]
    pub description: Option<Option<String>>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub category_id: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    #[validate(range(min = 1, max = 1000))]
    pub target_count: Option<u32>,
    pub target_period: Option<Period>,
    pub archived: Option<bool>,
}

impl UpdateHabitRequest {
    fn apply_to(self, habit: &mut Habit) {
        if let Some(name) = self.name {
            habit.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            habit.description = description;
        }
        if let Some(icon) = self.icon {
            habit.icon = icon;
        }
        if let Some(color) = self.color {
            habit.color = color;
        }
        if let Some(category_id) = self.category_id {
            habit.category_id = category_id;
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency;
        }
        if let Some(target_count) = self.target_count {
            habit.target_count = target_count;
        }
        if let Some(target_period) = self.target_period {
            habit.target_period = target_period;
        }
        if let Some(archived) = self.archived {
            habit.archived = archived;
        }
    }
}

// ─── Response Types ──────────────────────────────────────────

/// Habit with its category and live streak state.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitWithStreak {
    #[serde(flatten)]
    pub habit: HabitResponse,
    pub category: Option<Category>,
    pub streak: StreakInfo,
    pub total_completions: u32,
}

/// Habit detail view: summary plus most recent completions.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitDetail {
    #[serde(flatten)]
    pub summary: HabitWithStreak,
    pub completions: Vec<CompletionResponse>,
}

/// Resolve a category id against the built-ins and the owner's custom list.
fn resolve_category(category_id: Option<&str>, custom: &HashMap<String, Category>) -> Option<Category> {
    let id = category_id?;
    builtin_category(id).or_else(|| custom.get(id).cloned())
}

fn completion_times(completions: &[Completion]) -> Vec<DateTime<Utc>> {
    completions.iter().map(|c| c.completed_at).collect()
}

/// Streak state for a habit; a corrupt stored cadence yields an empty streak.
fn streak_for(habit: &Habit, completions: &[DateTime<Utc>], now: DateTime<Utc>) -> StreakInfo {
    match habit.streak_rule() {
        Ok(rule) => rule.evaluate(completions, now),
        Err(e) => {
            tracing::warn!(habit_id = %habit.id, error = %e, "Invalid stored cadence");
            StreakInfo::default()
        }
    }
}

fn summarize(
    habit: Habit,
    completions: &[Completion],
    custom: &HashMap<String, Category>,
    now: DateTime<Utc>,
) -> HabitWithStreak {
    let streak = streak_for(&habit, &completion_times(completions), now);
    let category = resolve_category(habit.category_id.as_deref(), custom);

    HabitWithStreak {
        habit: habit.into(),
        category,
        streak,
        total_completions: completions.len() as u32,
    }
}

async fn custom_categories(state: &AppState, user_id: &str) -> Result<HashMap<String, Category>> {
    Ok(state
        .db
        .list_custom_categories(user_id)
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect())
}

// ─── Handlers ────────────────────────────────────────────────

/// List a user's habits (newest first) with streak info.
async fn list_habits(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<ListHabitsQuery>, QueryRejection>,
) -> Result<Json<Vec<HabitWithStreak>>> {
    let params = validated_query(params)?;

    tracing::debug!(
        user_id = %params.user_id,
        include_archived = params.include_archived,
        "Listing habits"
    );

    let habits = state
        .db
        .list_habits_for_user(&params.user_id, params.include_archived)
        .await?;

    let ids: Vec<String> = habits.iter().map(|h| h.id.clone()).collect();
    let completions = state.db.get_completions_for_habits(&ids).await?;
    let custom = custom_categories(&state, &params.user_id).await?;
    let now = Utc::now();

    let summaries = habits
        .into_iter()
        .zip(completions)
        .map(|(habit, completions)| summarize(habit, &completions, &custom, now))
        .collect();

    Ok(Json(summaries))
}

async fn create_habit(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateHabitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<HabitResponse>)> {
    let req = validated_json(payload)?;

    if let Some(category_id) = &req.category_id {
        ensure_category(&state, &req.user_id, category_id).await?;
    }

    let now = Utc::now();
    let habit = Habit {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: req.user_id,
        name: req.name.trim().to_string(),
        description: req.description,
        icon: req.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        color: req.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        category_id: req.category_id,
        frequency: req.frequency,
        target_count: req.target_count,
        target_period: req.target_period,
        archived: false,
        created_at: now,
        updated_at: now,
    };
    habit.streak_rule()?;

    state.db.upsert_habit(&habit).await?;

    tracing::info!(habit_id = %habit.id, user_id = %habit.user_id, "Habit created");

    Ok((StatusCode::CREATED, Json(habit.into())))
}

async fn get_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HabitDetail>> {
    let habit = require_habit(&state, &id).await?;
    let completions = state.db.get_completions_for_habit(&id, None).await?;
    let custom = match habit.category_id.as_deref() {
        Some(category_id) if builtin_category(category_id).is_none() => {
            custom_categories(&state, &habit.user_id).await?
        }
        _ => HashMap::new(),
    };

    let summary = summarize(habit, &completions, &custom, Utc::now());
    let recent = completions
        .into_iter()
        .take(RECENT_COMPLETIONS_LIMIT)
        .map(CompletionResponse::from)
        .collect();

    Ok(Json(HabitDetail {
        summary,
        completions: recent,
    }))
}

async fn update_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateHabitRequest>, JsonRejection>,
) -> Result<Json<HabitResponse>> {
    let req = validated_json(payload)?;
    let mut habit = require_habit(&state, &id).await?;

    if let Some(Some(category_id)) = &req.category_id {
        ensure_category(&state, &habit.user_id, category_id).await?;
    }

    req.apply_to(&mut habit);
    habit.streak_rule()?;
    habit.updated_at = Utc::now();

    state.db.upsert_habit(&habit).await?;

    tracing::info!(habit_id = %habit.id, archived = habit.archived, "Habit updated");

    Ok(Json(habit.into()))
}

/// Hard delete; completions go with it.
async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    require_habit(&state, &id).await?;
    let deleted = state.db.delete_habit(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Habit deleted ({} documents removed)", deleted),
    }))
}

async fn get_habit_stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<HabitStats>> {
    let habit = require_habit(&state, &id).await?;
    let rule = habit.streak_rule().map_err(AppError::from)?;
    let completions = state.db.get_completions_for_habit(&id, None).await?;

    Ok(Json(stats::habit_stats(
        &habit,
        &rule,
        &completion_times(&completions),
        Utc::now(),
    )))
}
