use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::connection::RoomConnection;
use crate::models::matches::{MatchEvent, MatchMessage};
use crate::repositories::errors::websocket_repository_errors::WebSocketRepositoryError;
use crate::repositories::websocket_repository::WebSocketRepository;
use crate::services::errors::notifier_errors::NotifierError;
use crate::services::notifier::MatchNotifier;

/// Tracks which websocket connections watch which room and pushes match events to them.
#[derive(Clone)]
pub struct WebSocketService {
    repository: Arc<dyn WebSocketRepository + Send + Sync>,
}

impl WebSocketService {
    pub fn new(repository: Arc<dyn WebSocketRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn connect(
        &self,
        connection_id: &str,
        room_id: &str,
        user_id: &str,
    ) -> Result<(), WebSocketRepositoryError> {
        info!(
            "Storing WebSocket connection {} for user {} in room {}",
            connection_id, user_id, room_id
        );
        let connection = RoomConnection::new(connection_id, room_id, user_id);
        self.repository.store_connection(&connection).await
    }

    pub async fn disconnect(&self, connection_id: &str) -> Result<(), WebSocketRepositoryError> {
        info!("Removing WebSocket connection: {}", connection_id);
        self.repository.remove_connection(connection_id).await
    }

    pub async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<bool, WebSocketRepositoryError> {
        self.repository.send_message(connection_id, message).await
    }
}

#[async_trait]
impl MatchNotifier for WebSocketService {
    async fn publish(&self, event: &MatchEvent) -> Result<(), NotifierError> {
        let message = serde_json::to_string(&MatchMessage::from(event))
            .map_err(|e| NotifierError::Serialization(e.to_string()))?;
        let connections = self.repository.get_room_connections(&event.room_id).await?;

        info!(
            "Sending match for room {} to {} connections",
            event.room_id,
            connections.len()
        );
        for connection in connections {
            match self
                .repository
                .send_message(&connection.connection_id, &message)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    info!("Connection {} is gone, removing", connection.connection_id);
                    self.repository
                        .remove_connection(&connection.connection_id)
                        .await?;
                }
                // One broken connection must not starve the rest of the room.
                Err(e) => warn!(
                    "Failed to notify connection {}: {}",
                    connection.connection_id, e
                ),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory::InMemoryWebSocketRepository;
    use crate::repositories::websocket_repository::MockWebSocketRepository;

    fn event() -> MatchEvent {
        MatchEvent {
            room_id: "room-1".to_string(),
            food_id: "pizza".to_string(),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_connection_in_the_room() {
        let repository = Arc::new(InMemoryWebSocketRepository::new());
        let service = WebSocketService::new(repository.clone());
        service.connect("conn-a", "room-1", "alice").await.unwrap();
        service.connect("conn-b", "room-1", "bob").await.unwrap();
        service.connect("conn-c", "room-2", "carol").await.unwrap();

        service.publish(&event()).await.unwrap();

        let mut recipients: Vec<String> = repository
            .sent_messages()
            .await
            .into_iter()
            .map(|(connection_id, message)| {
                let frame: serde_json::Value = serde_json::from_str(&message).unwrap();
                assert_eq!(frame["action"], "match");
                assert_eq!(frame["food_id"], "pizza");
                connection_id
            })
            .collect();
        recipients.sort();
        assert_eq!(recipients, vec!["conn-a", "conn-b"]);
    }

    #[tokio::test]
    async fn test_gone_connections_are_removed() {
        let repository = Arc::new(InMemoryWebSocketRepository::new());
        let service = WebSocketService::new(repository.clone());
        service.connect("conn-a", "room-1", "alice").await.unwrap();
        service.connect("conn-b", "room-1", "bob").await.unwrap();
        repository.drop_connection("conn-a").await;

        service.publish(&event()).await.unwrap();

        let remaining = repository.get_room_connections("room-1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].connection_id, "conn-b");
    }

    #[tokio::test]
    async fn test_send_failure_does_not_stop_fan_out() {
        let mut repository = MockWebSocketRepository::new();
        repository.expect_get_room_connections().returning(|room_id| {
            Ok(vec![
                RoomConnection::new("conn-a", room_id, "alice"),
                RoomConnection::new("conn-b", room_id, "bob"),
            ])
        });
        repository
            .expect_send_message()
            .withf(|connection_id, _| connection_id == "conn-a")
            .returning(|_, _| Err(WebSocketRepositoryError::ApiGateway("throttled".to_string())));
        repository
            .expect_send_message()
            .withf(|connection_id, _| connection_id == "conn-b")
            .times(1)
            .returning(|_, _| Ok(true));
        repository.expect_remove_connection().times(0);
        let service = WebSocketService::new(Arc::new(repository));

        assert!(service.publish(&event()).await.is_ok());
    }
}
