use crate::repositories::errors::websocket_repository_errors::WebSocketRepositoryError;

#[derive(Debug)]
pub enum NotifierError {
    Serialization(String),
    Delivery(WebSocketRepositoryError),
}

impl std::fmt::Display for NotifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifierError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            NotifierError::Delivery(err) => write!(f, "Delivery error: {}", err),
        }
    }
}

impl std::error::Error for NotifierError {}

impl From<WebSocketRepositoryError> for NotifierError {
    fn from(err: WebSocketRepositoryError) -> Self {
        NotifierError::Delivery(err)
    }
}
