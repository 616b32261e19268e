use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::responses::ErrorResponse;
use shared::services::errors::{
    catalog_service_errors::CatalogServiceError, matching_service_errors::MatchingServiceError,
    room_service_errors::RoomServiceError, room_session_errors::RoomSessionError,
};

#[derive(Debug)]
pub enum ApiError {
    RoomService(RoomServiceError),
    CatalogService(CatalogServiceError),
    MatchingService(MatchingServiceError),
    RoomSession(RoomSessionError),
    NotFound(String),
}

impl From<RoomServiceError> for ApiError {
    fn from(error: RoomServiceError) -> Self {
        ApiError::RoomService(error)
    }
}

impl From<CatalogServiceError> for ApiError {
    fn from(error: CatalogServiceError) -> Self {
        ApiError::CatalogService(error)
    }
}

impl From<MatchingServiceError> for ApiError {
    fn from(error: MatchingServiceError) -> Self {
        ApiError::MatchingService(error)
    }
}

impl From<RoomSessionError> for ApiError {
    fn from(error: RoomSessionError) -> Self {
        ApiError::RoomSession(error)
    }
}

fn room_service_status(error: &RoomServiceError) -> StatusCode {
    match error {
        RoomServiceError::RoomNotFound(_) | RoomServiceError::ParticipantNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        RoomServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
        RoomServiceError::CodeGenerationExhausted
        | RoomServiceError::RoomRepositoryError(_)
        | RoomServiceError::ParticipantRepositoryError(_)
        | RoomServiceError::SessionStoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn catalog_service_status(error: &CatalogServiceError) -> StatusCode {
    match error {
        CatalogServiceError::FoodNotFound(_) => StatusCode::NOT_FOUND,
        CatalogServiceError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn matching_service_status(error: &MatchingServiceError) -> StatusCode {
    match error {
        MatchingServiceError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        MatchingServiceError::SwipeRepositoryError(_)
        | MatchingServiceError::MatchRepositoryError(_)
        | MatchingServiceError::MissingSwipe { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RoomService(error) => room_service_status(error),
            ApiError::CatalogService(error) => catalog_service_status(error),
            ApiError::MatchingService(error) => matching_service_status(error),
            ApiError::RoomSession(error) => match error {
                RoomSessionError::UnknownParticipant(_) | RoomSessionError::FoodNotInCatalog(_) => {
                    StatusCode::NOT_FOUND
                }
                RoomSessionError::EmptyCatalog => StatusCode::BAD_REQUEST,
                RoomSessionError::RoomServiceError(error) => room_service_status(error),
                RoomSessionError::CatalogServiceError(error) => catalog_service_status(error),
                RoomSessionError::MatchingServiceError(error) => matching_service_status(error),
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::RoomService(error) => error.to_string(),
            ApiError::CatalogService(error) => error.to_string(),
            ApiError::MatchingService(error) => error.to_string(),
            ApiError::RoomSession(error) => error.to_string(),
            ApiError::NotFound(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage details stay in the logs.
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.message()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
