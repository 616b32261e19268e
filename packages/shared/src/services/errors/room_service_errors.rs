use crate::repositories::errors::{
    participant_repository_errors::ParticipantRepositoryError,
    room_repository_errors::RoomRepositoryError,
};
use crate::services::errors::session_store_errors::SessionStoreError;

#[derive(Debug)]
pub enum RoomServiceError {
    RoomNotFound(String),
    ParticipantNotFound(String),
    ValidationError(String),
    /// Every generated code collided with an existing room.
    CodeGenerationExhausted,
    RoomRepositoryError(RoomRepositoryError),
    ParticipantRepositoryError(ParticipantRepositoryError),
    SessionStoreError(SessionStoreError),
}

impl std::fmt::Display for RoomServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomServiceError::RoomNotFound(code) => write!(f, "Room not found: {}", code),
            RoomServiceError::ParticipantNotFound(id) => {
                write!(f, "Participant not found: {}", id)
            }
            RoomServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RoomServiceError::CodeGenerationExhausted => {
                write!(f, "Could not generate a unique room code")
            }
            RoomServiceError::RoomRepositoryError(err) => {
                write!(f, "Room repository error: {}", err)
            }
            RoomServiceError::ParticipantRepositoryError(err) => {
                write!(f, "Participant repository error: {}", err)
            }
            RoomServiceError::SessionStoreError(err) => write!(f, "Session store error: {}", err),
        }
    }
}

impl std::error::Error for RoomServiceError {}

impl From<RoomRepositoryError> for RoomServiceError {
    fn from(err: RoomRepositoryError) -> Self {
        RoomServiceError::RoomRepositoryError(err)
    }
}

impl From<ParticipantRepositoryError> for RoomServiceError {
    fn from(err: ParticipantRepositoryError) -> Self {
        RoomServiceError::ParticipantRepositoryError(err)
    }
}

impl From<SessionStoreError> for RoomServiceError {
    fn from(err: SessionStoreError) -> Self {
        RoomServiceError::SessionStoreError(err)
    }
}
