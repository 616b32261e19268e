use crate::repositories::errors::{
    match_repository_errors::MatchRepositoryError, swipe_repository_errors::SwipeRepositoryError,
};

#[derive(Debug)]
pub enum MatchingServiceError {
    SwipeRepositoryError(SwipeRepositoryError),
    MatchRepositoryError(MatchRepositoryError),
    /// The ledger reported a duplicate but holds no row for the triple.
    MissingSwipe {
        room_id: String,
        user_id: String,
        food_id: String,
    },
    RoomNotFound(String),
}

impl std::fmt::Display for MatchingServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingServiceError::SwipeRepositoryError(err) => {
                write!(f, "Swipe repository error: {}", err)
            }
            MatchingServiceError::MatchRepositoryError(err) => {
                write!(f, "Match repository error: {}", err)
            }
            MatchingServiceError::MissingSwipe {
                room_id,
                user_id,
                food_id,
            } => write!(
                f,
                "Swipe by {} on {} in room {} reported as duplicate but not found",
                user_id, food_id, room_id
            ),
            MatchingServiceError::RoomNotFound(room_id) => {
                write!(f, "Room not found: {}", room_id)
            }
        }
    }
}

impl std::error::Error for MatchingServiceError {}

impl From<SwipeRepositoryError> for MatchingServiceError {
    fn from(err: SwipeRepositoryError) -> Self {
        MatchingServiceError::SwipeRepositoryError(err)
    }
}

impl From<MatchRepositoryError> for MatchingServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        MatchingServiceError::MatchRepositoryError(err)
    }
}
