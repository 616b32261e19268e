use async_trait::async_trait;
use aws_sdk_apigatewaymanagement::{error::SdkError as ApiGatewaySdkError, primitives::Blob};
use aws_sdk_apigatewaymanagement::Client as ApiGatewayClient;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use serde_dynamo::{from_item, to_item};
use tracing::info;

#[cfg(test)]
use mockall::automock;

use crate::config::TableConfig;
use crate::models::connection::RoomConnection;
use crate::repositories::errors::websocket_repository_errors::WebSocketRepositoryError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSocketRepository: Send + Sync {
    async fn store_connection(
        &self,
        connection: &RoomConnection,
    ) -> Result<(), WebSocketRepositoryError>;

    async fn remove_connection(&self, connection_id: &str)
        -> Result<(), WebSocketRepositoryError>;

    async fn get_room_connections(
        &self,
        room_id: &str,
    ) -> Result<Vec<RoomConnection>, WebSocketRepositoryError>;

    /// `Ok(false)` when the connection no longer exists on the gateway side.
    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<bool, WebSocketRepositoryError>;
}

pub struct DynamoDbWebSocketRepository {
    dynamodb_client: DynamoDbClient,
    api_gateway_client: ApiGatewayClient,
    table_name: String,
}

impl DynamoDbWebSocketRepository {
    /// `api_gateway_client` must be configured with the websocket management endpoint.
    pub fn new(
        dynamodb_client: DynamoDbClient,
        api_gateway_client: ApiGatewayClient,
        config: &TableConfig,
    ) -> Self {
        Self {
            dynamodb_client,
            api_gateway_client,
            table_name: config.room_connections_table.clone(),
        }
    }
}

#[async_trait]
impl WebSocketRepository for DynamoDbWebSocketRepository {
    async fn store_connection(
        &self,
        connection: &RoomConnection,
    ) -> Result<(), WebSocketRepositoryError> {
        let item = to_item(connection)
            .map_err(|e| WebSocketRepositoryError::Serialization(e.to_string()))?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| WebSocketRepositoryError::DynamoDb(e.to_string()))?;

        info!(
            "Stored connection {} for user {} in room {}",
            connection.connection_id, connection.user_id, connection.room_id
        );
        Ok(())
    }

    async fn remove_connection(
        &self,
        connection_id: &str,
    ) -> Result<(), WebSocketRepositoryError> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                "connection_id",
                AttributeValue::S(connection_id.to_string()),
            )
            .send()
            .await
            .map_err(|e| WebSocketRepositoryError::DynamoDb(e.to_string()))?;

        info!("Removed connection {}", connection_id);
        Ok(())
    }

    async fn get_room_connections(
        &self,
        room_id: &str,
    ) -> Result<Vec<RoomConnection>, WebSocketRepositoryError> {
        let output = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_ConnectionsByRoom")
            .key_condition_expression("room_id = :room_id")
            .expression_attribute_values(":room_id", AttributeValue::S(room_id.to_string()))
            .send()
            .await
            .map_err(|e| WebSocketRepositoryError::DynamoDb(e.to_string()))?;

        output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                from_item(item).map_err(|e| WebSocketRepositoryError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<bool, WebSocketRepositoryError> {
        let result = self
            .api_gateway_client
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(message.as_bytes()))
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("Sent message to connection: {}", connection_id);
                Ok(true)
            }
            Err(e) => {
                if let ApiGatewaySdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_gone_exception() {
                        return Ok(false);
                    }
                }
                Err(WebSocketRepositoryError::ApiGateway(e.to_string()))
            }
        }
    }
}
