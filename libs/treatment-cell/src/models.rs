// libs/treatment-cell/src/models.rs
use serde::{Deserialize, Serialize};

use shared_models::AppError;

/// Catalog entry bookable through appointments and recommendable from
/// consultations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTreatmentRequest {
    pub name: String,
    pub description: Option<String>,
    pub base_price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTreatmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TreatmentError {
    #[error("Treatment not found")]
    NotFound,

    #[error("Cannot delete: the treatment is already used in bookings")]
    InUse,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<TreatmentError> for AppError {
    fn from(err: TreatmentError) -> Self {
        match err {
            TreatmentError::NotFound => AppError::NotFound("Treatment not found".to_string()),
            TreatmentError::InUse => AppError::Conflict(err.to_string()),
            TreatmentError::Database(msg) => AppError::Database(msg),
        }
    }
}
