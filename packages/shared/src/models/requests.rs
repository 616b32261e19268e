use serde::{Deserialize, Serialize};

use crate::models::swipe::Direction;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JoinRoomRequest {
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RejoinRoomRequest {
    pub user_id: String,
}

/// The client names the food it swiped so a retried request never lands on the next card.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwipeRequest {
    pub user_id: String,
    pub food_id: String,
    pub direction: Direction,
}
