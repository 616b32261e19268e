#[derive(Debug)]
pub enum SwipeRepositoryError {
    /// The (room, user, food) triple already has a swipe.
    Conflict,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for SwipeRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwipeRepositoryError::Conflict => write!(f, "Swipe already recorded"),
            SwipeRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            SwipeRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for SwipeRepositoryError {}
