use crate::services::errors::{
    catalog_service_errors::CatalogServiceError, matching_service_errors::MatchingServiceError,
    room_service_errors::RoomServiceError,
};

#[derive(Debug)]
pub enum RoomSessionError {
    UnknownParticipant(String),
    /// The catalog has no foods, so there is nothing to swipe.
    EmptyCatalog,
    FoodNotInCatalog(String),
    RoomServiceError(RoomServiceError),
    CatalogServiceError(CatalogServiceError),
    MatchingServiceError(MatchingServiceError),
}

impl std::fmt::Display for RoomSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomSessionError::UnknownParticipant(id) => {
                write!(f, "Participant {} is not part of this room", id)
            }
            RoomSessionError::EmptyCatalog => write!(f, "The food catalog is empty"),
            RoomSessionError::FoodNotInCatalog(id) => write!(f, "Food not found: {}", id),
            RoomSessionError::RoomServiceError(err) => write!(f, "{}", err),
            RoomSessionError::CatalogServiceError(err) => write!(f, "{}", err),
            RoomSessionError::MatchingServiceError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RoomSessionError {}

impl From<RoomServiceError> for RoomSessionError {
    fn from(err: RoomServiceError) -> Self {
        RoomSessionError::RoomServiceError(err)
    }
}

impl From<CatalogServiceError> for RoomSessionError {
    fn from(err: CatalogServiceError) -> Self {
        RoomSessionError::CatalogServiceError(err)
    }
}

impl From<MatchingServiceError> for RoomSessionError {
    fn from(err: MatchingServiceError) -> Self {
        RoomSessionError::MatchingServiceError(err)
    }
}
