// libs/treatment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{CreateTreatmentRequest, UpdateTreatmentRequest};
use crate::services::treatment::TreatmentService;

#[axum::debug_handler]
pub async fn list_treatments(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = TreatmentService::new(&state);
    let treatments = service.list().await?;
    Ok(Json(json!(treatments)))
}

#[axum::debug_handler]
pub async fn get_treatment(
    State(state): State<Arc<AppConfig>>,
    Path(treatment_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let service = TreatmentService::new(&state);
    let treatment = service.get(treatment_id).await?;
    Ok(Json(json!(treatment)))
}

#[axum::debug_handler]
pub async fn create_treatment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateTreatmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    if request.base_price < 0.0 {
        return Err(AppError::ValidationError(
            "Base price cannot be negative".to_string(),
        ));
    }

    let service = TreatmentService::new(&state);
    let treatment = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!(treatment))))
}

#[axum::debug_handler]
pub async fn update_treatment(
    State(state): State<Arc<AppConfig>>,
    Path(treatment_id): Path<i32>,
    Json(request): Json<UpdateTreatmentRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(base_price) = request.base_price {
        if base_price < 0.0 {
            return Err(AppError::ValidationError(
                "Base price cannot be negative".to_string(),
            ));
        }
    }

    let service = TreatmentService::new(&state);
    let treatment = service.update(treatment_id, request).await?;
    Ok(Json(json!(treatment)))
}

#[axum::debug_handler]
pub async fn delete_treatment(
    State(state): State<Arc<AppConfig>>,
    Path(treatment_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = TreatmentService::new(&state);
    service.delete(treatment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
