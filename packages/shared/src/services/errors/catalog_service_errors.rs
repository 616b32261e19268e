use crate::repositories::errors::food_repository_errors::FoodRepositoryError;

#[derive(Debug)]
pub enum CatalogServiceError {
    FoodNotFound(String),
    RepositoryError(FoodRepositoryError),
}

impl std::fmt::Display for CatalogServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogServiceError::FoodNotFound(id) => write!(f, "Food not found: {}", id),
            CatalogServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for CatalogServiceError {}

impl From<FoodRepositoryError> for CatalogServiceError {
    fn from(err: FoodRepositoryError) -> Self {
        CatalogServiceError::RepositoryError(err)
    }
}
