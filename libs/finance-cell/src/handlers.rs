// libs/finance-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{CreateExpenseRequest, DateRangeQuery};
use crate::services::{ExpenseService, ReportService};

#[axum::debug_handler]
pub async fn list_expenses(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ExpenseService::new(&state);
    let expenses = service.list(query).await?;
    Ok(Json(json!(expenses)))
}

#[axum::debug_handler]
pub async fn create_expense(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ExpenseService::new(&state);
    let expense = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!(expense))))
}

#[axum::debug_handler]
pub async fn delete_expense(
    State(state): State<Arc<AppConfig>>,
    Path(expense_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = ExpenseService::new(&state);
    service.delete(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn get_income(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&state);
    let report = service.income(&query).await?;
    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn get_balance(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&state);
    let report = service.balance(&query).await?;
    Ok(Json(json!(report)))
}
