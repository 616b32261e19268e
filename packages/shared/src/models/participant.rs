use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Participant {
    pub id: String,
    pub room_id: String,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(room_id: &str, display_name: &str) -> Self {
        Participant {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            display_name: display_name.to_string(),
            joined_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_creation() {
        let participant = Participant::new("room-1", "Jess");

        assert_eq!(participant.room_id, "room-1");
        assert_eq!(participant.display_name, "Jess");
        assert!(!participant.id.is_empty());
    }

    #[test]
    fn test_participant_id_uniqueness() {
        let first = Participant::new("room-1", "Jess");
        let second = Participant::new("room-1", "Jess");

        assert_ne!(first.id, second.id);
    }
}
