// libs/treatment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn treatment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_treatments))
        .route("/", post(handlers::create_treatment))
        .route("/{treatment_id}", get(handlers::get_treatment))
        .route("/{treatment_id}", put(handlers::update_treatment))
        .route("/{treatment_id}", delete(handlers::delete_treatment))
        .with_state(state)
}
