// libs/specialist-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn specialist_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_specialists))
        .route("/", post(handlers::create_specialist))
        .route("/{specialist_id}", get(handlers::get_specialist))
        .route("/{specialist_id}", put(handlers::update_specialist))
        .route("/{specialist_id}", delete(handlers::delete_specialist))
        .with_state(state)
}
