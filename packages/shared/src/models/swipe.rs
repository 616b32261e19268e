use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Like,
    Pass,
}

/// One participant's decision on one food within one room.
/// The (room_id, user_id, food_id) triple is unique in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Swipe {
    pub room_id: String,
    pub user_id: String,
    pub food_id: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

impl Swipe {
    pub fn new(room_id: &str, user_id: &str, food_id: &str, direction: Direction) -> Self {
        Swipe {
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
            food_id: food_id.to_string(),
            direction,
            created_at: Utc::now(),
        }
    }

    /// Sort key within a room partition: "{food_id}#{user_id}".
    /// Prefixing with the food keeps every swipe on one food in a contiguous range.
    pub fn swipe_key(&self) -> String {
        swipe_key(&self.food_id, &self.user_id)
    }

    pub fn is_like(&self) -> bool {
        self.direction == Direction::Like
    }
}

pub fn swipe_key(food_id: &str, user_id: &str) -> String {
    format!("{}#{}", food_id, user_id)
}

/// Result of evaluating one swipe against the room's like-state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SwipeOutcome {
    NoMatch,
    /// A mutual like exists. `won` is false when another swipe created the match first.
    Matched { food_id: String, won: bool },
    /// The room had already matched before this swipe; nothing was recorded.
    AlreadyMatched { food_id: String },
}

impl SwipeOutcome {
    pub fn matched_food_id(&self) -> Option<&str> {
        match self {
            SwipeOutcome::NoMatch => None,
            SwipeOutcome::Matched { food_id, .. } | SwipeOutcome::AlreadyMatched { food_id } => {
                Some(food_id.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_creation() {
        let swipe = Swipe::new("room-1", "user-1", "food-1", Direction::Like);

        assert_eq!(swipe.room_id, "room-1");
        assert_eq!(swipe.user_id, "user-1");
        assert_eq!(swipe.food_id, "food-1");
        assert!(swipe.is_like());
    }

    #[test]
    fn test_swipe_key() {
        let swipe = Swipe::new("room-1", "user-1", "food-1", Direction::Pass);

        assert_eq!(swipe.swipe_key(), "food-1#user-1");
        assert!(!swipe.is_like());
    }

    #[test]
    fn test_direction_wire_format() {
        assert_eq!(serde_json::to_string(&Direction::Like).unwrap(), "\"like\"");
        assert_eq!(serde_json::to_string(&Direction::Pass).unwrap(), "\"pass\"");

        let direction: Direction = serde_json::from_str("\"pass\"").unwrap();
        assert_eq!(direction, Direction::Pass);
        assert!(serde_json::from_str::<Direction>("\"maybe\"").is_err());
    }

    #[test]
    fn test_outcome_wire_format() {
        let outcome = SwipeOutcome::Matched {
            food_id: "food-1".to_string(),
            won: true,
        };

        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"outcome": "matched", "food_id": "food-1", "won": true})
        );
        assert_eq!(
            serde_json::to_value(SwipeOutcome::NoMatch).unwrap(),
            serde_json::json!({"outcome": "no_match"})
        );
    }

    #[test]
    fn test_outcome_matched_food_id() {
        assert_eq!(SwipeOutcome::NoMatch.matched_food_id(), None);
        assert_eq!(
            SwipeOutcome::AlreadyMatched {
                food_id: "f".to_string()
            }
            .matched_food_id(),
            Some("f")
        );
    }
}
