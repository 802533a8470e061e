// libs/finance-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shared_models::AppError;

/// A clinic outgoing: materials, rent, payouts to a specialist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i32,
    pub amount: f64,
    pub reason: String,
    pub date: NaiveDateTime,
    pub specialist_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub reason: String,
    /// `%Y-%m-%d`; defaults to today when absent.
    pub date: Option<String>,
    pub specialist_id: i32,
}

/// Optional `%Y-%m-%d` bounds; both inclusive on their whole day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncomeReport {
    pub appointments_income: f64,
    pub consultations_income: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceReport {
    pub income: IncomeReport,
    pub expenses: f64,
    pub net: f64,
}

/// Subset of a booking row needed to total up received payments.
#[derive(Debug, Clone, Deserialize)]
pub struct PaidBooking {
    pub amount_paid: f64,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum FinanceError {
    #[error("Expense not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<FinanceError> for AppError {
    fn from(err: FinanceError) -> Self {
        match err {
            FinanceError::NotFound => AppError::NotFound("Expense not found".to_string()),
            FinanceError::Validation(msg) => AppError::ValidationError(msg),
            FinanceError::Database(msg) => AppError::Database(msg),
        }
    }
}
