use axum::{extract::State, routing::get, Json, Router};
use lambda_http::tracing::error;

use crate::{error::ApiError, state::AppState};
use shared::models::food::Food;

pub fn routes() -> Router<AppState> {
    Router::new().route("/foods", get(list_foods))
}

async fn list_foods(State(state): State<AppState>) -> Result<Json<Vec<Food>>, ApiError> {
    let foods = state.catalog_service.list_foods().await.map_err(|e| {
        error!("Failed to list foods: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(foods))
}
