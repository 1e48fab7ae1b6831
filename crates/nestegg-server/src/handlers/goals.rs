//! Goal and recommendation handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::read_json;
use crate::{AppError, AppState, SuccessResponse};
use nestegg_core::goals::{acceleration_message, GoalProgress};
use nestegg_core::models::{Goal, NewGoal};
use nestegg_core::validation::{parse_target_date, AmountInput};
use nestegg_core::{GoalSnapshot, RecommendationSet, SnapshotWindow};

/// Longest averaging window accepted from clients
const MAX_WINDOW_MONTHS: u32 = 36;

/// Most spending categories accepted from clients
const MAX_TOP_CATEGORIES: usize = 20;

/// A goal together with its progress figures
#[derive(Serialize)]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

impl From<Goal> for GoalWithProgress {
    fn from(goal: Goal) -> Self {
        let progress = goal.progress();
        Self { goal, progress }
    }
}

/// Body of POST /api/goals
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_amount: AmountInput,
    /// YYYY-MM-DD or an RFC 3339 timestamp
    #[serde(default)]
    pub target_date: Option<String>,
}

/// Query parameters for goal recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    /// Months of history to average
    pub months: Option<u32>,
    /// Number of spending categories to consider
    pub top: Option<usize>,
    /// Last day of the window (defaults to today)
    pub as_of: Option<NaiveDate>,
}

/// Recommendation set with the acceleration highlight rendered
#[derive(Serialize)]
pub struct AdviceResponse {
    #[serde(flatten)]
    pub advice: RecommendationSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    /// Inputs the advice was computed from
    pub snapshot: GoalSnapshot,
}

impl AdviceResponse {
    fn new(advice: RecommendationSet, snapshot: GoalSnapshot) -> Self {
        let highlight = advice.acceleration.as_ref().map(acceleration_message);
        Self {
            advice,
            highlight,
            snapshot,
        }
    }
}

/// GET /api/goals - All goals with progress
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GoalWithProgress>>, AppError> {
    let goals = state.db.list_goals(state.config.user_id)?;
    Ok(Json(goals.into_iter().map(GoalWithProgress::from).collect()))
}

/// GET /api/goals/active - Goals not yet completed
pub async fn list_active_goals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GoalWithProgress>>, AppError> {
    let goals = state.db.list_active_goals(state.config.user_id)?;
    Ok(Json(goals.into_iter().map(GoalWithProgress::from).collect()))
}

/// POST /api/goals - Create a goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<GoalWithProgress>, AppError> {
    let req: CreateGoalRequest = read_json(request).await?;

    let new_goal = NewGoal {
        name: req.name,
        description: req.description.filter(|d| !d.trim().is_empty()),
        target_amount: req.target_amount.to_amount()?,
        target_date: req
            .target_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(parse_target_date)
            .transpose()?,
    };

    let user_id = state.config.user_id;
    let id = state.db.create_goal(user_id, &new_goal)?;
    let goal = state
        .db
        .get_goal(user_id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;

    Ok(Json(goal.into()))
}

/// GET /api/goals/:id
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<GoalWithProgress>, AppError> {
    let goal = state
        .db
        .get_goal(state.config.user_id, id)?
        .ok_or_else(|| AppError::not_found("Goal not found"))?;
    Ok(Json(goal.into()))
}

/// DELETE /api/goals/:id
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_goal(state.config.user_id, id)? {
        return Err(AppError::not_found("Goal not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/goals/:id/recommendations - Advice from recorded transactions
pub async fn goal_recommendations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<AdviceResponse>, AppError> {
    let mut window = SnapshotWindow::default();
    if let Some(months) = params.months {
        if months == 0 || months > MAX_WINDOW_MONTHS {
            return Err(AppError::bad_request(&format!(
                "months must be between 1 and {}",
                MAX_WINDOW_MONTHS
            )));
        }
        window = window.with_months(months);
    }
    if let Some(top) = params.top {
        window = window.with_top_n(top.min(MAX_TOP_CATEGORIES));
    }
    if let Some(as_of) = params.as_of {
        window = window.as_of(as_of);
    }

    let snapshot = state
        .db
        .goal_snapshot(state.config.user_id, id, &window)?;
    let advice = state.engine.compute(&snapshot);
    debug!("Goal {}: {} recommendations", id, advice.len());

    Ok(Json(AdviceResponse::new(advice, snapshot)))
}

/// POST /api/recommendations - Advice for a snapshot supplied by the client
pub async fn compute_recommendations(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<AdviceResponse>, AppError> {
    let snapshot: GoalSnapshot = read_json(request).await?;
    snapshot.validate()?;

    let advice = state.engine.compute(&snapshot);
    Ok(Json(AdviceResponse::new(advice, snapshot)))
}
