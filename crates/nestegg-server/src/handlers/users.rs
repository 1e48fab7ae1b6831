//! Current user handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{AppError, AppState};
use nestegg_core::models::User;

/// GET /api/me - The user this server acts as
pub async fn get_me(State(state): State<Arc<AppState>>) -> Result<Json<User>, AppError> {
    let user = state
        .db
        .get_user(state.config.user_id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}
