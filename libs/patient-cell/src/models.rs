// libs/patient-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::{AppError, Gender};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i32,
    pub first_names: String,
    pub last_names: String,
    pub national_id: String,
    pub gender: Gender,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_names: String,
    pub last_names: String,
    pub national_id: String,
    pub gender: Gender,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_names: Option<String>,
    pub last_names: Option<String>,
    pub national_id: Option<String>,
    pub gender: Option<Gender>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("The national id {0} is already registered")]
    DuplicateNationalId(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
            PatientError::DuplicateNationalId(_) => AppError::Conflict(err.to_string()),
            PatientError::Database(msg) => AppError::Database(msg),
        }
    }
}
