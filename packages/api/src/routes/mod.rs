use axum::Router;

use crate::state::AppState;

pub mod foods;
pub mod health;
pub mod rooms;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(foods::routes())
        .merge(rooms::routes())
        .with_state(state)
}
