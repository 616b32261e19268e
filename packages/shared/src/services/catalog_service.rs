use std::sync::Arc;

use crate::{
    models::food::Food,
    repositories::{
        errors::food_repository_errors::FoodRepositoryError, food_repository::FoodRepository,
    },
    services::errors::catalog_service_errors::CatalogServiceError,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn FoodRepository + Send + Sync>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn FoodRepository + Send + Sync>) -> Self {
        CatalogService { repository }
    }

    /// Every food in catalog order.
    pub async fn list_foods(&self) -> Result<Vec<Food>, CatalogServiceError> {
        self.repository
            .list_foods()
            .await
            .map_err(CatalogServiceError::from)
    }

    pub async fn get_food(&self, food_id: &str) -> Result<Food, CatalogServiceError> {
        match self.repository.get_food(food_id).await {
            Ok(food) => Ok(food),
            Err(FoodRepositoryError::NotFound) => {
                Err(CatalogServiceError::FoodNotFound(food_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::food_repository::MockFoodRepository;

    #[tokio::test]
    async fn test_missing_food_is_reported_by_id() {
        let mut repository = MockFoodRepository::new();
        repository
            .expect_get_food()
            .returning(|_| Err(FoodRepositoryError::NotFound));
        let service = CatalogService::new(Arc::new(repository));

        let result = service.get_food("food-404").await;

        assert!(matches!(result, Err(CatalogServiceError::FoodNotFound(id)) if id == "food-404"));
    }

    #[tokio::test]
    async fn test_storage_errors_pass_through() {
        let mut repository = MockFoodRepository::new();
        repository
            .expect_list_foods()
            .returning(|| Err(FoodRepositoryError::DynamoDb("unavailable".to_string())));
        let service = CatalogService::new(Arc::new(repository));

        let result = service.list_foods().await;

        assert!(matches!(
            result,
            Err(CatalogServiceError::RepositoryError(FoodRepositoryError::DynamoDb(_)))
        ));
    }
}
