use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live websocket connection subscribed to one room's match events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomConnection {
    pub connection_id: String,
    pub room_id: String,
    pub user_id: String,
    pub connected_at: DateTime<Utc>,
}

impl RoomConnection {
    pub fn new(connection_id: &str, room_id: &str, user_id: &str) -> Self {
        RoomConnection {
            connection_id: connection_id.to_string(),
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
            connected_at: Utc::now(),
        }
    }
}
