use std::collections::HashSet;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};

#[cfg(test)]
use mockall::automock;

use crate::config::TableConfig;
use crate::models::swipe::{swipe_key, Direction, Swipe};
use crate::repositories::errors::swipe_repository_errors::SwipeRepositoryError;

/// Append-only ledger of swipe decisions. Partitioned by room, sorted by "{food_id}#{user_id}".
pub struct DynamoDbSwipeRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbSwipeRepository {
    pub fn new(client: Client, config: &TableConfig) -> Self {
        Self {
            client,
            table_name: config.swipes_table.clone(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SwipeRepository: Send + Sync {
    /// Fails with `Conflict` when the triple already has a swipe.
    async fn record(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
        direction: Direction,
    ) -> Result<Swipe, SwipeRepositoryError>;

    /// Whether anyone other than `excluding_user_id` liked this food in this room.
    async fn has_opposing_like(
        &self,
        room_id: &str,
        food_id: &str,
        excluding_user_id: &str,
    ) -> Result<bool, SwipeRepositoryError>;

    async fn get_swipe(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
    ) -> Result<Option<Swipe>, SwipeRepositoryError>;

    async fn swiped_food_ids(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<HashSet<String>, SwipeRepositoryError>;
}

#[async_trait]
impl SwipeRepository for DynamoDbSwipeRepository {
    async fn record(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
        direction: Direction,
    ) -> Result<Swipe, SwipeRepositoryError> {
        let swipe = Swipe::new(room_id, user_id, food_id, direction);
        let mut item: std::collections::HashMap<String, AttributeValue> =
            to_item(&swipe).map_err(|e| SwipeRepositoryError::Serialization(e.to_string()))?;
        item.insert("swipe_key".to_string(), AttributeValue::S(swipe.swipe_key()));

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(swipe_key)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(swipe),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(SwipeRepositoryError::Conflict);
                    }
                }
                Err(SwipeRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn has_opposing_like(
        &self,
        room_id: &str,
        food_id: &str,
        excluding_user_id: &str,
    ) -> Result<bool, SwipeRepositoryError> {
        // Limit applies before the filter, so page until the first hit instead.
        let mut pages = self
            .client
            .query()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key_condition_expression("room_id = :room_id AND begins_with(swipe_key, :prefix)")
            .filter_expression("#direction = :like AND user_id <> :user_id")
            .expression_attribute_names("#direction", "direction")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .expression_attribute_values(":prefix", AttributeValue::S(format!("{}#", food_id)))
            .expression_attribute_values(":like", AttributeValue::S("like".to_string()))
            .expression_attribute_values(
                ":user_id",
                AttributeValue::S(excluding_user_id.to_string()),
            )
            .into_paginator()
            .items()
            .send();

        match pages.next().await {
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(SwipeRepositoryError::DynamoDb(e.to_string())),
            None => Ok(false),
        }
    }

    async fn get_swipe(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
    ) -> Result<Option<Swipe>, SwipeRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key("room_id", AttributeValue::S(room_id.to_string()))
            .key("swipe_key", AttributeValue::S(swipe_key(food_id, user_id)))
            .send()
            .await
            .map_err(|e| SwipeRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => from_item(item)
                .map(Some)
                .map_err(|e| SwipeRepositoryError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    async fn swiped_food_ids(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<HashSet<String>, SwipeRepositoryError> {
        let mut pages = self
            .client
            .query()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key_condition_expression("room_id = :room_id")
            .filter_expression("user_id = :user_id")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
            .into_paginator()
            .items()
            .send();

        let mut food_ids = HashSet::new();
        while let Some(item) = pages.next().await {
            let item = item.map_err(|e| SwipeRepositoryError::DynamoDb(e.to_string()))?;
            let swipe: Swipe =
                from_item(item).map_err(|e| SwipeRepositoryError::Serialization(e.to_string()))?;
            food_ids.insert(swipe.food_id);
        }

        Ok(food_ids)
    }
}
