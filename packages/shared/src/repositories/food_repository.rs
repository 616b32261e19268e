use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value};

#[cfg(test)]
use mockall::automock;

use crate::config::TableConfig;
use crate::models::food::{sort_catalog, Food};
use crate::repositories::errors::food_repository_errors::FoodRepositoryError;

pub struct DynamoDbFoodRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbFoodRepository {
    pub fn new(client: Client, config: &TableConfig) -> Self {
        Self {
            client,
            table_name: config.foods_table.clone(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait FoodRepository: Send + Sync {
    /// Every food in catalog order.
    async fn list_foods(&self) -> Result<Vec<Food>, FoodRepositoryError>;
    async fn get_food(&self, food_id: &str) -> Result<Food, FoodRepositoryError>;
}

#[async_trait]
impl FoodRepository for DynamoDbFoodRepository {
    async fn list_foods(&self) -> Result<Vec<Food>, FoodRepositoryError> {
        let mut pages = self
            .client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send();

        let mut foods = Vec::new();
        while let Some(item) = pages.next().await {
            let item = item.map_err(|e| FoodRepositoryError::DynamoDb(e.to_string()))?;
            let food: Food =
                from_item(item).map_err(|e| FoodRepositoryError::Serialization(e.to_string()))?;
            foods.push(food);
        }

        sort_catalog(&mut foods);
        Ok(foods)
    }

    async fn get_food(&self, food_id: &str) -> Result<Food, FoodRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(food_id)
                    .map_err(|e| FoodRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| FoodRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                from_item(item).map_err(|e| FoodRepositoryError::Serialization(e.to_string()))
            }
            None => Err(FoodRepositoryError::NotFound),
        }
    }
}
