// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{
    AppointmentSearchQuery, BookingRef, ConsultationSearchQuery, CreateAppointmentRequest,
    CreateConsultationRequest, UpdateAppointmentRequest, UpdateConsultationRequest,
};
use crate::services::appointment::AppointmentService;
use crate::services::consultation::ConsultationService;

#[derive(Debug, Deserialize)]
pub struct AvailabilityCheckQuery {
    pub specialist_id: Option<i32>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub exclude_appointment_id: Option<i32>,
    pub exclude_consultation_id: Option<i32>,
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AppointmentSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);
    let appointments = service.search(params).await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service.get(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i32>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);
    let appointment = service.update(appointment_id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = AppointmentService::new(&state);
    service.delete(appointment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Read-only availability probe used by the agenda form before submitting.
#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AvailabilityCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let exclude = match (params.exclude_appointment_id, params.exclude_consultation_id) {
        (Some(id), _) => Some(BookingRef::Appointment(id)),
        (None, Some(id)) => Some(BookingRef::Consultation(id)),
        (None, None) => None,
    };

    let service = AppointmentService::new(&state);
    let available = service
        .availability()
        .is_specialist_available(params.specialist_id, params.start, params.end, exclude)
        .await?;

    Ok(Json(json!({ "available": available })))
}

// ==============================================================================
// CONSULTATION HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_consultations(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<ConsultationSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationService::new(&state);
    let consultations = service.search(params).await?;
    Ok(Json(json!(consultations)))
}

#[axum::debug_handler]
pub async fn get_consultation(
    State(state): State<Arc<AppConfig>>,
    Path(consultation_id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationService::new(&state);
    let consultation = service.get(consultation_id).await?;
    Ok(Json(json!(consultation)))
}

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<CreateConsultationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = ConsultationService::new(&state);
    let consultation = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!(consultation))))
}

#[axum::debug_handler]
pub async fn update_consultation(
    State(state): State<Arc<AppConfig>>,
    Path(consultation_id): Path<i32>,
    Json(request): Json<UpdateConsultationRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ConsultationService::new(&state);
    let consultation = service.update(consultation_id, request).await?;
    Ok(Json(json!(consultation)))
}

#[axum::debug_handler]
pub async fn delete_consultation(
    State(state): State<Arc<AppConfig>>,
    Path(consultation_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let service = ConsultationService::new(&state);
    service.delete(consultation_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
