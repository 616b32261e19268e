use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lambda_http::tracing::{debug, error, info};

use crate::{error::ApiError, state::AppState};
use shared::{
    models::{
        matches::Match,
        participant::Participant,
        requests::{JoinRoomRequest, RejoinRoomRequest, SwipeRequest},
        responses::{Card, SwipeResponse},
        room::Room,
    },
    services::room_session::RoomSession,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/{code}", get(get_room))
        .route("/rooms/{code}/participants", post(join_room))
        .route("/rooms/{code}/rejoin", post(rejoin_room))
        .route(
            "/rooms/{code}/participants/{user_id}/card",
            get(get_card),
        )
        .route("/rooms/{code}/swipes", post(swipe))
        .route("/rooms/{code}/match", get(get_match))
}

async fn create_room(State(state): State<AppState>) -> Result<(StatusCode, Json<Room>), ApiError> {
    let room = state.room_service.create_room().await.map_err(|e| {
        error!("Failed to create room: {}", e);
        ApiError::from(e)
    })?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Room>, ApiError> {
    let room = state.room_service.find_by_code(&code).await?;
    Ok(Json(room))
}

async fn join_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<JoinRoomRequest>,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let participant = state
        .room_service
        .join_room(&code, &payload.display_name)
        .await
        .map_err(|e| {
            error!("Failed to join room {}: {}", code, e);
            ApiError::from(e)
        })?;
    Ok((StatusCode::CREATED, Json(participant)))
}

async fn rejoin_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<RejoinRoomRequest>,
) -> Result<Json<Participant>, ApiError> {
    let participant = state
        .room_service
        .rejoin_room(&code, &payload.user_id)
        .await
        .map_err(|e| {
            error!("Failed to rejoin room {} as {}: {}", code, payload.user_id, e);
            ApiError::from(e)
        })?;
    Ok(Json(participant))
}

/// A room session with `user_id`'s cursor restored from the ledger.
async fn session_for(
    state: &AppState,
    code: &str,
    user_id: &str,
) -> Result<RoomSession, ApiError> {
    let mut session = RoomSession::load(
        code,
        &state.room_service,
        &state.catalog_service,
        &state.matching_service,
    )
    .await?;
    session.restore_cursor(user_id).await?;
    Ok(session)
}

async fn get_card(
    State(state): State<AppState>,
    Path((code, user_id)): Path<(String, String)>,
) -> Result<Json<Card>, ApiError> {
    let session = session_for(&state, &code, &user_id).await?;
    Ok(Json(session.card(&user_id)?))
}

async fn swipe(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    let mut session = session_for(&state, &code, &payload.user_id).await?;

    let outcome = session
        .swipe_food(&payload.user_id, &payload.food_id, payload.direction)
        .await
        .map_err(|e| {
            error!(
                "Failed to record swipe by {} on {} in room {}: {}",
                payload.user_id, payload.food_id, code, e
            );
            ApiError::from(e)
        })?;

    if let Some(food_id) = outcome.matched_food_id() {
        info!("Room {} matched on {}", code, food_id);
    } else {
        debug!("Swipe by {} in room {} did not match", payload.user_id, code);
    }

    Ok(Json(SwipeResponse {
        card: session.card(&payload.user_id)?,
        outcome,
    }))
}

async fn get_match(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Match>, ApiError> {
    let room = state.room_service.find_by_code(&code).await?;
    match state.matching_service.get_match(&room.id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(format!(
            "Room {} has not matched yet",
            room.code
        ))),
    }
}
