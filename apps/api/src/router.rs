use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use finance_cell::router::finance_routes;
use patient_cell::router::patient_routes;
use scheduling_cell::router::{appointment_routes, consultation_routes};
use shared_config::AppConfig;
use specialist_cell::router::specialist_routes;
use treatment_cell::router::treatment_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/api/patients", patient_routes(state.clone()))
        .nest("/api/specialists", specialist_routes(state.clone()))
        .nest("/api/treatments", treatment_routes(state.clone()))
        .nest("/api/appointments", appointment_routes(state.clone()))
        .nest("/api/consultations", consultation_routes(state.clone()))
        .nest("/api/finance", finance_routes(state))
}
