use axum::{http::StatusCode, routing::get, Router};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness probe; touches no backend.
async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Healthy!")
}
