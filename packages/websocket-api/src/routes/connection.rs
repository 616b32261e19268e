use lambda_runtime::Error;
use serde_json::{json, Value};
use shared::services::errors::room_service_errors::RoomServiceError;
use tracing::{debug, error, info, warn};

use crate::routes::response;
use crate::state::AppState;

/// Binds the connection to a participant of a room, so the room's match event reaches it.
pub async fn handle_connect(
    connection_id: &str,
    room_id: Option<&str>,
    user_id: Option<&str>,
    state: &AppState,
) -> Result<Value, Error> {
    let (room_id, user_id) = match (room_id, user_id) {
        (Some(room_id), Some(user_id)) => (room_id, user_id),
        _ => {
            warn!(
                "Rejecting connection {} without room_id and user_id",
                connection_id
            );
            return Ok(response(
                400,
                Some(json!({"error": "room_id and user_id are required"})),
            ));
        }
    };

    match state.room_service.get_participant(user_id).await {
        Ok(participant) if participant.room_id == room_id => {}
        Ok(_) | Err(RoomServiceError::ParticipantNotFound(_)) => {
            warn!(
                "Rejecting connection {}: {} is not in room {}",
                connection_id, user_id, room_id
            );
            return Ok(response(
                404,
                Some(json!({"error": "Participant not found in room"})),
            ));
        }
        Err(e) => {
            error!("Failed to look up participant {}: {}", user_id, e);
            return Ok(response(
                500,
                Some(json!({"error": "Failed to store connection"})),
            ));
        }
    }

    if let Err(e) = state
        .websocket_service
        .connect(connection_id, room_id, user_id)
        .await
    {
        error!("Failed to store connection {}: {}", connection_id, e);
        return Ok(response(
            500,
            Some(json!({"error": "Failed to store connection"})),
        ));
    }

    info!(
        "WebSocket connection {} subscribed to room {}",
        connection_id, room_id
    );
    Ok(response(200, None))
}

pub async fn handle_disconnect(connection_id: &str, state: &AppState) -> Result<Value, Error> {
    debug!("Handling disconnect for {}", connection_id);
    if let Err(e) = state.websocket_service.disconnect(connection_id).await {
        error!("Failed to remove connection {}: {}", connection_id, e);
    }
    Ok(response(200, None))
}
