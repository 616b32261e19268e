#[derive(Debug)]
pub enum WebSocketRepositoryError {
    Serialization(String),
    DynamoDb(String),
    ApiGateway(String),
}

impl std::fmt::Display for WebSocketRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebSocketRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            WebSocketRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
            WebSocketRepositoryError::ApiGateway(msg) => write!(f, "API Gateway error: {}", msg),
        }
    }
}

impl std::error::Error for WebSocketRepositoryError {}
