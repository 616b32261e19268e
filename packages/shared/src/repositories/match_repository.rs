use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem, Update};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};

#[cfg(test)]
use mockall::automock;

use crate::config::TableConfig;
use crate::models::matches::Match;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Atomic insert-if-absent keyed by room. `Ok(true)` when this call created the match,
    /// `Ok(false)` when the room already had one. The room is flipped to matched in the
    /// same write, so a match row and a matched room never exist without each other.
    async fn create_match(&self, record: &Match) -> Result<bool, MatchRepositoryError>;

    async fn get_match(&self, room_id: &str) -> Result<Option<Match>, MatchRepositoryError>;
}

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
    pub rooms_table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client, config: &TableConfig) -> Self {
        Self {
            client,
            table_name: config.matches_table.clone(),
            rooms_table_name: config.rooms_table.clone(),
        }
    }
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    async fn create_match(&self, record: &Match) -> Result<bool, MatchRepositoryError> {
        let item =
            to_item(record).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        let transaction_items = vec![
            // One match row per room
            TransactWriteItem::builder()
                .put(
                    Put::builder()
                        .table_name(&self.table_name)
                        .set_item(Some(item))
                        .condition_expression("attribute_not_exists(room_id)")
                        .build()
                        .map_err(|e| MatchRepositoryError::TransactionError(e.to_string()))?,
                )
                .build(),
            // Active -> Matched, exactly once
            TransactWriteItem::builder()
                .update(
                    Update::builder()
                        .table_name(&self.rooms_table_name)
                        .key("id", AttributeValue::S(record.room_id.clone()))
                        .update_expression(
                            "SET #status = :matched, matched_food_id = :food_id",
                        )
                        .condition_expression("#status = :active")
                        .expression_attribute_names("#status", "status")
                        .expression_attribute_values(
                            ":matched",
                            AttributeValue::S("matched".to_string()),
                        )
                        .expression_attribute_values(
                            ":active",
                            AttributeValue::S("active".to_string()),
                        )
                        .expression_attribute_values(
                            ":food_id",
                            AttributeValue::S(record.food_id.clone()),
                        )
                        .build()
                        .map_err(|e| MatchRepositoryError::TransactionError(e.to_string()))?,
                )
                .build(),
        ];

        let result = self
            .client
            .transact_write_items()
            .set_transact_items(Some(transaction_items))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if let TransactWriteItemsError::TransactionCanceledException(canceled) =
                        service_err.err()
                    {
                        let condition_failed = canceled
                            .cancellation_reasons()
                            .iter()
                            .any(|reason| reason.code() == Some("ConditionalCheckFailed"));
                        if condition_failed {
                            return Ok(false);
                        }
                    }
                }
                Err(MatchRepositoryError::TransactionError(e.to_string()))
            }
        }
    }

    async fn get_match(&self, room_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key("room_id", AttributeValue::S(room_id.to_string()))
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => from_item(item)
                .map(Some)
                .map_err(|e| MatchRepositoryError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }
}
