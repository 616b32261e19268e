use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::builders::GetItemFluentBuilder;
use aws_sdk_dynamodb::operation::transact_write_items::builders::TransactWriteItemsFluentBuilder;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

use crate::config::TableConfig;
use crate::models::room::Room;
use crate::repositories::errors::room_repository_errors::RoomRepositoryError;

pub struct DynamoDbRoomRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbRoomRepository {
    pub fn new(client: Client, config: &TableConfig) -> Self {
        Self {
            client,
            table_name: config.rooms_table.clone(),
        }
    }

    /// Room row plus a code reservation row in one transaction. The reservation carries
    /// no `code` attribute, so it stays out of `GSI_RoomByCode`.
    fn create_room_request(
        &self,
        room: &Room,
    ) -> Result<TransactWriteItemsFluentBuilder, RoomRepositoryError> {
        let item = to_item(room).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        let room_put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .build()
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;
        let code_put = Put::builder()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(code_reservation_key(&room.code)))
            .item("room_id", AttributeValue::S(room.id.clone()))
            .condition_expression("attribute_not_exists(id)")
            .build()
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        Ok(self.client.transact_write_items().set_transact_items(Some(vec![
            TransactWriteItem::builder().put(room_put).build(),
            TransactWriteItem::builder().put(code_put).build(),
        ])))
    }

    fn get_room_request(&self, room_id: &str) -> Result<GetItemFluentBuilder, RoomRepositoryError> {
        Ok(self
            .client
            .get_item()
            .table_name(&self.table_name)
            .consistent_read(true)
            .key(
                "id",
                to_attribute_value(room_id)
                    .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?,
            ))
    }
}

fn code_reservation_key(code: &str) -> String {
    format!("code#{}", code)
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Fails with `AlreadyExists` on a duplicate id and `CodeTaken` when another room
    /// already holds the code.
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError>;
    async fn get_room_by_id(&self, room_id: &str) -> Result<Room, RoomRepositoryError>;
    /// `code` must already be normalized to upper case.
    async fn get_room_by_code(&self, code: &str) -> Result<Room, RoomRepositoryError>;
    async fn code_exists(&self, code: &str) -> Result<bool, RoomRepositoryError>;
}

#[async_trait]
impl RoomRepository for DynamoDbRoomRepository {
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let result = self.create_room_request(room)?.send().await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if let TransactWriteItemsError::TransactionCanceledException(canceled) =
                        service_err.err()
                    {
                        let failed: Vec<bool> = canceled
                            .cancellation_reasons()
                            .iter()
                            .map(|reason| reason.code() == Some("ConditionalCheckFailed"))
                            .collect();
                        if failed.get(1) == Some(&true) {
                            return Err(RoomRepositoryError::CodeTaken(room.code.clone()));
                        }
                        if failed.first() == Some(&true) {
                            return Err(RoomRepositoryError::AlreadyExists);
                        }
                    }
                }
                Err(RoomRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_room_by_id(&self, room_id: &str) -> Result<Room, RoomRepositoryError> {
        let output = self
            .get_room_request(room_id)?
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                from_item(item).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))
            }
            None => Err(RoomRepositoryError::NotFound),
        }
    }

    async fn get_room_by_code(&self, code: &str) -> Result<Room, RoomRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_RoomByCode")
            .key_condition_expression("code = :code")
            .expression_attribute_values(
                ":code",
                to_attribute_value(code)
                    .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        // The index is eventually consistent; re-read the base item so the status is current.
        let item = output
            .items
            .and_then(|items| items.into_iter().next())
            .ok_or(RoomRepositoryError::NotFound)?;
        let room: Room =
            from_item(item).map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?;

        self.get_room_by_id(&room.id).await
    }

    async fn code_exists(&self, code: &str) -> Result<bool, RoomRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_RoomByCode")
            .key_condition_expression("code = :code")
            .expression_attribute_values(
                ":code",
                to_attribute_value(code)
                    .map_err(|e| RoomRepositoryError::Serialization(e.to_string()))?,
            )
            .limit(1)
            .send()
            .await
            .map_err(|e| RoomRepositoryError::DynamoDb(e.to_string()))?;

        Ok(output
            .items
            .as_ref()
            .map_or(false, |items| !items.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Region};

    fn repository() -> DynamoDbRoomRepository {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build();
        DynamoDbRoomRepository {
            client: Client::from_conf(config),
            table_name: "rooms".to_string(),
        }
    }

    #[test]
    fn test_room_reads_are_strongly_consistent() {
        let request = repository().get_room_request("room-1").unwrap();

        assert_eq!(request.as_input().get_consistent_read(), &Some(true));
    }

    #[test]
    fn test_create_room_reserves_the_code_in_the_same_transaction() {
        let room = Room::new("ABC123");

        let request = repository().create_room_request(&room).unwrap();

        let items = request.as_input().get_transact_items().clone().unwrap();
        assert_eq!(items.len(), 2);
        let reservation = items[1].put().unwrap();
        assert_eq!(
            reservation.item().get("id"),
            Some(&AttributeValue::S("code#ABC123".to_string()))
        );
        assert!(!reservation.item().contains_key("code"));
        for item in &items {
            assert_eq!(
                item.put().unwrap().condition_expression(),
                Some("attribute_not_exists(id)")
            );
        }
    }
}
