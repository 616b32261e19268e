use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Matched,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub code: String,
    pub status: RoomStatus,
    pub matched_food_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(code: &str) -> Self {
        Room {
            id: Uuid::new_v4().to_string(),
            code: normalize_code(code),
            status: RoomStatus::Active,
            matched_food_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.status == RoomStatus::Matched
    }
}

/// Room codes are case-insensitive; the stored form is upper case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
