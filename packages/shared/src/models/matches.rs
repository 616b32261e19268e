use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single food a room converged on. At most one per room, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub room_id: String,
    pub food_id: String,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(room_id: &str, food_id: &str) -> Self {
        Match {
            room_id: room_id.to_string(),
            food_id: food_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn event(&self) -> MatchEvent {
        MatchEvent {
            room_id: self.room_id.clone(),
            food_id: self.food_id.clone(),
        }
    }
}

/// Payload delivered to every subscriber of a room when its match is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MatchEvent {
    pub room_id: String,
    pub food_id: String,
}

/// Websocket frame carrying a [`MatchEvent`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchMessage {
    pub action: String,
    pub room_id: String,
    pub food_id: String,
}

impl From<&MatchEvent> for MatchMessage {
    fn from(event: &MatchEvent) -> Self {
        MatchMessage {
            action: "match".to_string(),
            room_id: event.room_id.clone(),
            food_id: event.food_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_event_carries_room_and_food() {
        let record = Match::new("room-1", "food-9");

        let event = record.event();

        assert_eq!(event.room_id, "room-1");
        assert_eq!(event.food_id, "food-9");
    }

    #[test]
    fn test_match_message_wire_format() {
        let event = MatchEvent {
            room_id: "room-1".to_string(),
            food_id: "food-9".to_string(),
        };

        let value = serde_json::to_value(MatchMessage::from(&event)).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"action": "match", "room_id": "room-1", "food_id": "food-9"})
        );
    }
}
