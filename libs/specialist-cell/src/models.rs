// libs/specialist-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::{AppError, Gender};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialist {
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
pub struct CreateSpecialistRequest {
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
pub struct UpdateSpecialistRequest {
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
pub enum SpecialistError {
    #[error("Specialist not found")]
    NotFound,

    #[error("The national id {0} is already registered")]
    DuplicateNationalId(String),

    #[error("The email {0} is already registered")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<SpecialistError> for AppError {
    fn from(err: SpecialistError) -> Self {
        match err {
            SpecialistError::NotFound => AppError::NotFound("Specialist not found".to_string()),
            SpecialistError::DuplicateNationalId(_) | SpecialistError::DuplicateEmail(_) => {
                AppError::Conflict(err.to_string())
            }
            SpecialistError::Database(msg) => AppError::Database(msg),
        }
    }
}
