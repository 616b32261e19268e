use std::sync::Arc;

use shared::services::room_service::RoomService;
use shared::services::websocket_service::WebSocketService;

#[derive(Clone)]
pub struct AppState {
    pub websocket_service: Arc<WebSocketService>,
    pub room_service: Arc<RoomService>,
}
