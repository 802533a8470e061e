// libs/specialist-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{CreateSpecialistRequest, UpdateSpecialistRequest};
use crate::services::specialist::SpecialistService;

#[axum::debug_handler]
pub async fn list_specialists(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialistService::new(&state);
    let specialists = service.list().await?;
    Ok(Json(json!(specialists)))
}

#[axum::debug_handler]
pub async fn get_specialist(
    State(state): State<Arc<AppConfig>>,
    Path(specialist_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialistService::new(&state);
    let specialist = service.get(specialist_id).await?;
    Ok(Json(json!(specialist)))
}

#[axum::debug_handler]
pub async fn create_specialist(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateSpecialistRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.first_names.trim().is_empty() || request.national_id.trim().is_empty() {
        return Err(AppError::ValidationError(
            "First names and national id are required".to_string(),
        ));
    }

    let service = SpecialistService::new(&state);
    let specialist = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!(specialist))))
}

#[axum::debug_handler]
pub async fn update_specialist(
    State(state): State<Arc<AppConfig>>,
    Path(specialist_id): Path<i32>,
    Json(request): Json<UpdateSpecialistRequest>,
) -> Result<Json<Value>, AppError> {
    let service = SpecialistService::new(&state);
    let specialist = service.update(specialist_id, request).await?;
    Ok(Json(json!(specialist)))
}

#[axum::debug_handler]
pub async fn delete_specialist(
    State(state): State<Arc<AppConfig>>,
    Path(specialist_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = SpecialistService::new(&state);
    service.delete(specialist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
