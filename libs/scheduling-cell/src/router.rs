// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/", post(handlers::create_appointment))
        .route("/availability/check", get(handlers::check_availability))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", put(handlers::update_appointment))
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .with_state(state)
}

pub fn consultation_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_consultations))
        .route("/", post(handlers::create_consultation))
        .route("/{consultation_id}", get(handlers::get_consultation))
        .route("/{consultation_id}", put(handlers::update_consultation))
        .route("/{consultation_id}", delete(handlers::delete_consultation))
        .with_state(state)
}
