// libs/finance-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn finance_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/expenses", get(handlers::list_expenses))
        .route("/expenses", post(handlers::create_expense))
        .route("/expenses/{expense_id}", delete(handlers::delete_expense))
        .route("/income", get(handlers::get_income))
        .route("/balance", get(handlers::get_balance))
        .with_state(state)
}
