pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::invoice::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_index))
        .route("/generate", post(handlers::handle_generate))
        .route("/reprint_page", get(handlers::handle_reprint_page))
        .route("/reprint", get(handlers::handle_reprint))
        .with_state(state)
}
