//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::read_json;
use crate::{AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use nestegg_core::models::{NewTransaction, Transaction, TransactionType};
use nestegg_core::validation::{parse_date, AmountInput};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Body of POST /api/transactions
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: AmountInput,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    /// YYYY-MM-DD
    pub date: String,
    #[serde(default)]
    pub eco_impact: Option<Decimal>,
    #[serde(default)]
    pub goal_id: Option<i64>,
}

/// GET /api/transactions - List the most recent transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let transactions = state.db.list_transactions(state.config.user_id, limit)?;
    Ok(Json(transactions))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let req: CreateTransactionRequest = read_json(request).await?;

    let new_tx = NewTransaction {
        transaction_type: req.transaction_type,
        amount: req.amount.to_amount()?,
        category: req.category,
        description: req.description.filter(|d| !d.trim().is_empty()),
        date: parse_date(&req.date)?,
        eco_impact: req.eco_impact,
        goal_id: req.goal_id,
    };

    let user_id = state.config.user_id;
    let id = state.db.insert_transaction(user_id, &new_tx)?;
    let transaction = state
        .db
        .get_transaction(user_id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    Ok(Json(transaction))
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = state
        .db
        .get_transaction(state.config.user_id, id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    Ok(Json(transaction))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete_transaction(state.config.user_id, id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(Json(SuccessResponse { success: true }))
}
