use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::models::matches::MatchEvent;
use crate::services::errors::notifier_errors::NotifierError;

const ROOM_CHANNEL_CAPACITY: usize = 16;

/// Delivers a room's match event to every participant connected to that room.
/// Delivery is at-least-once; receivers treat duplicates as no-ops.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MatchNotifier: Send + Sync {
    async fn publish(&self, event: &MatchEvent) -> Result<(), NotifierError>;
}

/// Per-room broadcast channels for the single-process shape.
#[derive(Default)]
pub struct InMemoryMatchNotifier {
    channels: Mutex<HashMap<String, broadcast::Sender<MatchEvent>>>,
}

impl InMemoryMatchNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, room_id: &str) -> broadcast::Receiver<MatchEvent> {
        let mut channels = self.channels.lock().await;
        channels
            .entry(room_id.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    pub async fn room_count(&self) -> usize {
        self.channels.lock().await.len()
    }
}

#[async_trait]
impl MatchNotifier for InMemoryMatchNotifier {
    async fn publish(&self, event: &MatchEvent) -> Result<(), NotifierError> {
        let mut channels = self.channels.lock().await;
        let idle = match channels.get(&event.room_id) {
            Some(tx) => {
                // Err only means nobody is listening right now.
                let delivered = tx.send(event.clone()).unwrap_or(0);
                debug!(
                    "Delivered match for room {} to {} subscribers",
                    event.room_id, delivered
                );
                tx.receiver_count() == 0
            }
            None => {
                debug!("No subscribers for room {}", event.room_id);
                false
            }
        };
        if idle {
            channels.remove(&event.room_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(room_id: &str) -> MatchEvent {
        MatchEvent {
            room_id: room_id.to_string(),
            food_id: "pizza".to_string(),
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_of_the_room_receives_the_event() {
        let notifier = InMemoryMatchNotifier::new();
        let mut first = notifier.subscribe("room-1").await;
        let mut second = notifier.subscribe("room-1").await;

        notifier.publish(&event("room-1")).await.unwrap();

        assert_eq!(first.recv().await.unwrap(), event("room-1"));
        assert_eq!(second.recv().await.unwrap(), event("room-1"));
    }

    #[tokio::test]
    async fn test_other_rooms_do_not_receive_the_event() {
        let notifier = InMemoryMatchNotifier::new();
        let mut other = notifier.subscribe("room-2").await;

        notifier.publish(&event("room-1")).await.unwrap();

        assert!(matches!(
            other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let notifier = InMemoryMatchNotifier::new();

        assert!(notifier.publish(&event("room-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_rooms_without_receivers_are_dropped_after_publish() {
        let notifier = InMemoryMatchNotifier::new();
        let gone = notifier.subscribe("room-1").await;
        let _kept = notifier.subscribe("room-2").await;
        drop(gone);

        notifier.publish(&event("room-1")).await.unwrap();
        notifier.publish(&event("room-2")).await.unwrap();

        assert_eq!(notifier.room_count().await, 1);
    }
}
