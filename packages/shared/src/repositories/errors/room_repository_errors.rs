#[derive(Debug)]
pub enum RoomRepositoryError {
    NotFound,
    AlreadyExists,
    CodeTaken(String),
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for RoomRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomRepositoryError::NotFound => write!(f, "Room not found"),
            RoomRepositoryError::AlreadyExists => write!(f, "Room already exists"),
            RoomRepositoryError::CodeTaken(code) => write!(f, "Room code {} is taken", code),
            RoomRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            RoomRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for RoomRepositoryError {}
