// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI content routes.
//!
//! Generation endpoints always answer with a payload: model failures fall
//! back to static content, and persistence failures are logged and skipped.
//! Only malformed input is rejected.

use crate::error::Result;
use crate::models::{Affirmation, Category};
use crate::routes::{validated_json, validated_query};
use crate::services::Provenance;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Affirmations returned by the history listing.
const AFFIRMATION_HISTORY_LIMIT: u32 = 30;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/affirmations", get(list_affirmations))
        .route("/api/ai/affirmation", post(generate_affirmation))
        .route("/api/ai/suggest-category", post(suggest_category))
        .route("/api/ai/suggestions", post(suggest_habits))
        .route("/api/ai/tips", post(habit_tips))
}

// ─── Request Types ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AffirmationRequest {
    #[validate(length(max = 500))]
    pub context: Option<String>,
    /// When present, the affirmation is stored in the user's history
    #[validate(length(min = 1, max = 128))]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SuggestCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub habit_name: String,
    #[validate(length(max = 500))]
    pub habit_description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SuggestionsRequest {
    /// Owner whose active habits the suggestions should complement
    #[validate(length(min = 1, max = 128))]
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TipsRequest {
    #[validate(length(min = 1, max = 100))]
    pub habit_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AffirmationsQuery {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

/// Malformed bodies on the lenient endpoints are treated as empty requests.
fn lenient<T: Default>(payload: std::result::Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Ignoring unparseable request body");
            T::default()
        }
    }
}

// ─── Response Types ──────────────────────────────────────────

/// Generated payload plus where it came from.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AiResponse<T> {
    pub data: T,
    pub source: Provenance,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AffirmationResponse {
    /// Set only once the affirmation has been stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Affirmation> for AffirmationResponse {
    fn from(affirmation: Affirmation) -> Self {
        Self {
            id: Some(affirmation.id),
            user_id: Some(affirmation.user_id),
            content: affirmation.content,
            source: Some(affirmation.source),
            created_at: Some(format_utc_rfc3339(affirmation.created_at)),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategorySuggestion {
    pub category_id: String,
    pub category: Category,
}

// ─── Handlers ────────────────────────────────────────────────

async fn generate_affirmation(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AffirmationRequest>, JsonRejection>,
) -> Result<Json<AiResponse<AffirmationResponse>>> {
    let req = lenient(payload);
    req.validate()?;

    let generated = state.ai.affirmation(req.context.as_deref()).await;
    let source = generated.source;

    let data = match req.user_id {
        Some(user_id) => {
            let affirmation = Affirmation {
                id: uuid::Uuid::new_v4().to_string(),
                user_id,
                content: generated.content,
                source,
                created_at: Utc::now(),
            };

            let stored = state.db.insert_affirmation(&affirmation).await;
            match stored {
                Ok(()) => affirmation.into(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to store affirmation, returning it unsaved");
                    AffirmationResponse {
                        id: None,
                        user_id: None,
                        content: affirmation.content,
                        source: None,
                        created_at: None,
                    }
                }
            }
        }
        None => AffirmationResponse {
            id: None,
            user_id: None,
            content: generated.content,
            source: None,
            created_at: None,
        },
    };

    tracing::info!(source = ?source, stored = data.id.is_some(), "Affirmation generated");

    Ok(Json(AiResponse { data, source }))
}

async fn suggest_category(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SuggestCategoryRequest>, JsonRejection>,
) -> Result<Json<AiResponse<CategorySuggestion>>> {
    let req = validated_json(payload)?;

    let generated = state
        .ai
        .suggest_category(&req.habit_name, req.habit_description.as_deref())
        .await;

    tracing::debug!(
        category = %generated.content.id,
        source = ?generated.source,
        "Category suggested"
    );

    Ok(Json(AiResponse {
        data: CategorySuggestion {
            category_id: generated.content.id.clone(),
            category: generated.content,
        },
        source: generated.source,
    }))
}

async fn suggest_habits(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SuggestionsRequest>, JsonRejection>,
) -> Result<Json<AiResponse<Vec<String>>>> {
    let req = lenient(payload);
    req.validate()?;

    let existing: Vec<String> = match req.user_id.as_deref() {
        Some(user_id) => match state.db.list_habits_for_user(user_id, false).await {
            Ok(habits) => habits.into_iter().map(|h| h.name).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load existing habits for suggestions");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let generated = state
        .ai
        .suggest_habits(&existing, req.category.as_deref())
        .await;

    Ok(Json(AiResponse {
        data: generated.content,
        source: generated.source,
    }))
}

async fn habit_tips(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<TipsRequest>, JsonRejection>,
) -> Result<Json<AiResponse<Vec<String>>>> {
    let req = validated_json(payload)?;
    let generated = state.ai.habit_tips(&req.habit_name).await;

    Ok(Json(AiResponse {
        data: generated.content,
        source: generated.source,
    }))
}

/// A user's recent affirmations, newest first.
async fn list_affirmations(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<AffirmationsQuery>, QueryRejection>,
) -> Result<Json<Vec<AffirmationResponse>>> {
    let params = validated_query(params)?;

    let affirmations = state
        .db
        .list_affirmations(&params.user_id, AFFIRMATION_HISTORY_LIMIT)
        .await?;

    Ok(Json(affirmations.into_iter().map(Into::into).collect()))
}
