// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Category routes: built-in catalog plus user-defined categories.

use crate::error::{AppError, Result};
use crate::models::category::{builtin_categories, is_builtin_category};
use crate::models::habit::{DEFAULT_COLOR, DEFAULT_ICON};
use crate::models::Category;
use crate::routes::{validated_json, validated_query, DeleteResponse};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/{id}", delete(delete_category))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoriesQuery {
    #[validate(length(min = 1, max = 128))]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Check that `category_id` names a built-in category or one owned by
/// `user_id`.
pub(crate) async fn ensure_category(
    state: &AppState,
    user_id: &str,
    category_id: &str,
) -> Result<()> {
    if is_builtin_category(category_id) {
        return Ok(());
    }

    match state.db.get_category(category_id).await? {
        Some(category) if category.user_id.as_deref() == Some(user_id) => Ok(()),
        _ => Err(AppError::invalid_field(
            "category_id",
            format!("Unknown category: {}", category_id),
        )),
    }
}

/// Built-in categories first, then the user's own (if a user is given).
async fn list_categories(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<CategoriesQuery>, QueryRejection>,
) -> Result<Json<Vec<Category>>> {
    let params = validated_query(params)?;
    let mut categories = builtin_categories();

    if let Some(user_id) = params.user_id.as_deref() {
        categories.extend(state.db.list_custom_categories(user_id).await?);
    }

    Ok(Json(categories))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>)> {
    let req = validated_json(payload)?;

    let category = Category {
        id: uuid::Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        icon: req.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        color: req.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        user_id: Some(req.user_id),
    };

    state.db.upsert_category(&category).await?;

    tracing::info!(category_id = %category.id, "Custom category created");

    Ok((StatusCode::CREATED, Json(category)))
}

/// Delete a custom category. Habits that referenced it keep the dangling
/// id and resolve to no category.
async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if is_builtin_category(&id) {
        return Err(AppError::BadRequest(format!(
            "Built-in category {} cannot be deleted",
            id
        )));
    }

    if state.db.get_category(&id).await?.is_none() {
        return Err(AppError::NotFound(format!("Category {} not found", id)));
    }

    state.db.delete_category(&id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: "Category deleted".to_string(),
    }))
}
