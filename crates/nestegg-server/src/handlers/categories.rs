//! Category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::read_json;
use crate::{AppError, AppState, SuccessResponse};
use nestegg_core::models::{Category, NewCategory, TransactionType};

/// Query parameters for listing categories
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// income or expense
    #[serde(rename = "type")]
    pub category_type: Option<String>,
}

/// GET /api/categories - List categories, optionally of one type
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<Vec<Category>>, AppError> {
    let category_type = params
        .category_type
        .as_deref()
        .map(|t| t.parse::<TransactionType>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let categories = state
        .db
        .list_categories(state.config.user_id, category_type)?;
    Ok(Json(categories))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Category>, AppError> {
    let req: NewCategory = read_json(request).await?;

    let user_id = state.config.user_id;
    let id = state.db.create_category(user_id, &req)?;
    let category = state
        .db
        .get_category(user_id, id)?
        .ok_or_else(|| AppError::not_found("Category not found"))?;

    Ok(Json(category))
}

/// DELETE /api/categories/:id
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_category(state.config.user_id, id)? {
        return Err(AppError::not_found("Category not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
