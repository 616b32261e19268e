#[derive(Debug)]
pub enum FoodRepositoryError {
    NotFound,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for FoodRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FoodRepositoryError::NotFound => write!(f, "Food not found"),
            FoodRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            FoodRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for FoodRepositoryError {}
