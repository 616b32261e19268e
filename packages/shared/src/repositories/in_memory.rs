//! Process-local backends for every repository contract.
//!
//! These drive the single-process simulation and the test suites. Each store keeps its
//! rows behind a `tokio::sync::RwLock`; uniqueness rules that DynamoDB enforces with
//! condition expressions are enforced here under the write lock.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::models::connection::RoomConnection;
use crate::models::food::{sort_catalog, Food};
use crate::models::matches::Match;
use crate::models::participant::Participant;
use crate::models::room::{Room, RoomStatus};
use crate::models::swipe::{Direction, Swipe};
use crate::repositories::errors::{
    food_repository_errors::FoodRepositoryError, match_repository_errors::MatchRepositoryError,
    participant_repository_errors::ParticipantRepositoryError,
    room_repository_errors::RoomRepositoryError, swipe_repository_errors::SwipeRepositoryError,
    websocket_repository_errors::WebSocketRepositoryError,
};
use crate::repositories::food_repository::FoodRepository;
use crate::repositories::match_repository::MatchRepository;
use crate::repositories::participant_repository::ParticipantRepository;
use crate::repositories::room_repository::RoomRepository;
use crate::repositories::swipe_repository::SwipeRepository;
use crate::repositories::websocket_repository::WebSocketRepository;

/// One of each in-memory store, wired so match creation can flip the room's status.
#[derive(Clone)]
pub struct InMemoryRepositories {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub foods: Arc<InMemoryFoodRepository>,
    pub participants: Arc<InMemoryParticipantRepository>,
    pub swipes: Arc<InMemorySwipeRepository>,
    pub matches: Arc<InMemoryMatchRepository>,
    pub connections: Arc<InMemoryWebSocketRepository>,
}

impl InMemoryRepositories {
    pub fn new(food_names: &[&str]) -> Self {
        let rooms = Arc::new(InMemoryRoomRepository::new());
        InMemoryRepositories {
            matches: Arc::new(InMemoryMatchRepository::new(rooms.clone())),
            rooms,
            foods: Arc::new(InMemoryFoodRepository::with_names(food_names)),
            participants: Arc::new(InMemoryParticipantRepository::new()),
            swipes: Arc::new(InMemorySwipeRepository::new()),
            connections: Arc::new(InMemoryWebSocketRepository::new()),
        }
    }
}

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<String, Room>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active -> Matched. `false` if the room is missing or no longer active.
    async fn mark_matched(&self, room_id: &str, food_id: &str) -> bool {
        let mut rooms = self.rooms.write().await;
        match rooms.get_mut(room_id) {
            Some(room) if room.status == RoomStatus::Active => {
                room.status = RoomStatus::Matched;
                room.matched_food_id = Some(food_id.to_string());
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, room: &Room) -> Result<(), RoomRepositoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            return Err(RoomRepositoryError::AlreadyExists);
        }
        if rooms.values().any(|existing| existing.code == room.code) {
            return Err(RoomRepositoryError::CodeTaken(room.code.clone()));
        }
        rooms.insert(room.id.clone(), room.clone());
        Ok(())
    }

    async fn get_room_by_id(&self, room_id: &str) -> Result<Room, RoomRepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or(RoomRepositoryError::NotFound)
    }

    async fn get_room_by_code(&self, code: &str) -> Result<Room, RoomRepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .values()
            .find(|room| room.code == code)
            .cloned()
            .ok_or(RoomRepositoryError::NotFound)
    }

    async fn code_exists(&self, code: &str) -> Result<bool, RoomRepositoryError> {
        let rooms = self.rooms.read().await;
        Ok(rooms.values().any(|room| room.code == code))
    }
}

pub struct InMemoryFoodRepository {
    foods: RwLock<Vec<Food>>,
}

impl InMemoryFoodRepository {
    /// Catalog in the given order; creation times are spaced so the order is stable.
    pub fn with_names(names: &[&str]) -> Self {
        let start = Utc::now();
        let foods = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut food = Food::new(name, None);
                food.created_at = start + Duration::milliseconds(i as i64);
                food
            })
            .collect();
        InMemoryFoodRepository {
            foods: RwLock::new(foods),
        }
    }
}

#[async_trait]
impl FoodRepository for InMemoryFoodRepository {
    async fn list_foods(&self) -> Result<Vec<Food>, FoodRepositoryError> {
        let mut foods = self.foods.read().await.clone();
        sort_catalog(&mut foods);
        Ok(foods)
    }

    async fn get_food(&self, food_id: &str) -> Result<Food, FoodRepositoryError> {
        let foods = self.foods.read().await;
        foods
            .iter()
            .find(|food| food.id == food_id)
            .cloned()
            .ok_or(FoodRepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct InMemoryParticipantRepository {
    participants: RwLock<HashMap<String, Participant>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn participant_count(&self) -> usize {
        self.participants.read().await.len()
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn create_participant(
        &self,
        participant: &Participant,
    ) -> Result<(), ParticipantRepositoryError> {
        let mut participants = self.participants.write().await;
        participants.insert(participant.id.clone(), participant.clone());
        Ok(())
    }

    async fn get_participant(
        &self,
        participant_id: &str,
    ) -> Result<Participant, ParticipantRepositoryError> {
        let participants = self.participants.read().await;
        participants
            .get(participant_id)
            .cloned()
            .ok_or(ParticipantRepositoryError::NotFound)
    }

    async fn list_participants(
        &self,
        room_id: &str,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        let participants = self.participants.read().await;
        let mut in_room: Vec<Participant> = participants
            .values()
            .filter(|participant| participant.room_id == room_id)
            .cloned()
            .collect();
        in_room.sort_by_key(|participant| participant.joined_at);
        Ok(in_room)
    }
}

type SwipeTriple = (String, String, String);

#[derive(Default)]
pub struct InMemorySwipeRepository {
    swipes: RwLock<HashMap<SwipeTriple, Swipe>>,
}

impl InMemorySwipeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn swipe_count(&self) -> usize {
        self.swipes.read().await.len()
    }
}

#[async_trait]
impl SwipeRepository for InMemorySwipeRepository {
    async fn record(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
        direction: Direction,
    ) -> Result<Swipe, SwipeRepositoryError> {
        let key = (
            room_id.to_string(),
            user_id.to_string(),
            food_id.to_string(),
        );
        let mut swipes = self.swipes.write().await;
        match swipes.entry(key) {
            Entry::Occupied(_) => Err(SwipeRepositoryError::Conflict),
            Entry::Vacant(slot) => {
                let swipe = Swipe::new(room_id, user_id, food_id, direction);
                slot.insert(swipe.clone());
                Ok(swipe)
            }
        }
    }

    async fn has_opposing_like(
        &self,
        room_id: &str,
        food_id: &str,
        excluding_user_id: &str,
    ) -> Result<bool, SwipeRepositoryError> {
        let swipes = self.swipes.read().await;
        Ok(swipes.values().any(|swipe| {
            swipe.room_id == room_id
                && swipe.food_id == food_id
                && swipe.user_id != excluding_user_id
                && swipe.is_like()
        }))
    }

    async fn get_swipe(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
    ) -> Result<Option<Swipe>, SwipeRepositoryError> {
        let key = (
            room_id.to_string(),
            user_id.to_string(),
            food_id.to_string(),
        );
        Ok(self.swipes.read().await.get(&key).cloned())
    }

    async fn swiped_food_ids(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<HashSet<String>, SwipeRepositoryError> {
        let swipes = self.swipes.read().await;
        Ok(swipes
            .values()
            .filter(|swipe| swipe.room_id == room_id && swipe.user_id == user_id)
            .map(|swipe| swipe.food_id.clone())
            .collect())
    }
}

pub struct InMemoryMatchRepository {
    matches: RwLock<HashMap<String, Match>>,
    rooms: Arc<InMemoryRoomRepository>,
}

impl InMemoryMatchRepository {
    pub fn new(rooms: Arc<InMemoryRoomRepository>) -> Self {
        InMemoryMatchRepository {
            matches: RwLock::new(HashMap::new()),
            rooms,
        }
    }

    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn create_match(&self, record: &Match) -> Result<bool, MatchRepositoryError> {
        // Lock order: matches, then rooms.
        let mut matches = self.matches.write().await;
        match matches.entry(record.room_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                if !self
                    .rooms
                    .mark_matched(&record.room_id, &record.food_id)
                    .await
                {
                    return Ok(false);
                }
                slot.insert(record.clone());
                Ok(true)
            }
        }
    }

    async fn get_match(&self, room_id: &str) -> Result<Option<Match>, MatchRepositoryError> {
        Ok(self.matches.read().await.get(room_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryWebSocketRepository {
    connections: RwLock<HashMap<String, RoomConnection>>,
    gone: RwLock<HashSet<String>>,
    sent: RwLock<Vec<(String, String)>>,
}

impl InMemoryWebSocketRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes later sends to this connection report it as gone.
    pub async fn drop_connection(&self, connection_id: &str) {
        self.gone.write().await.insert(connection_id.to_string());
    }

    /// Every (connection_id, message) delivered so far.
    pub async fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl WebSocketRepository for InMemoryWebSocketRepository {
    async fn store_connection(
        &self,
        connection: &RoomConnection,
    ) -> Result<(), WebSocketRepositoryError> {
        let mut connections = self.connections.write().await;
        connections.insert(connection.connection_id.clone(), connection.clone());
        Ok(())
    }

    async fn remove_connection(
        &self,
        connection_id: &str,
    ) -> Result<(), WebSocketRepositoryError> {
        self.connections.write().await.remove(connection_id);
        Ok(())
    }

    async fn get_room_connections(
        &self,
        room_id: &str,
    ) -> Result<Vec<RoomConnection>, WebSocketRepositoryError> {
        let connections = self.connections.read().await;
        Ok(connections
            .values()
            .filter(|connection| connection.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn send_message(
        &self,
        connection_id: &str,
        message: &str,
    ) -> Result<bool, WebSocketRepositoryError> {
        if self.gone.read().await.contains(connection_id) {
            return Ok(false);
        }
        self.sent
            .write()
            .await
            .push((connection_id.to_string(), message.to_string()));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_rejects_duplicate_triple() {
        let swipes = InMemorySwipeRepository::new();

        swipes
            .record("room", "alice", "pizza", Direction::Like)
            .await
            .unwrap();
        let second = swipes
            .record("room", "alice", "pizza", Direction::Pass)
            .await;

        assert!(matches!(second, Err(SwipeRepositoryError::Conflict)));
        assert_eq!(swipes.swipe_count().await, 1);
        let stored = swipes
            .get_swipe("room", "alice", "pizza")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.direction, Direction::Like);
    }

    #[tokio::test]
    async fn test_has_opposing_like_ignores_own_likes_and_passes() {
        let swipes = InMemorySwipeRepository::new();
        swipes
            .record("room", "alice", "pizza", Direction::Like)
            .await
            .unwrap();
        swipes
            .record("room", "bob", "sushi", Direction::Pass)
            .await
            .unwrap();
        swipes
            .record("other-room", "bob", "pizza", Direction::Like)
            .await
            .unwrap();

        assert!(!swipes
            .has_opposing_like("room", "pizza", "alice")
            .await
            .unwrap());
        assert!(swipes
            .has_opposing_like("room", "pizza", "bob")
            .await
            .unwrap());
        assert!(!swipes
            .has_opposing_like("room", "sushi", "alice")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_swiped_food_ids_scoped_to_room_and_user() {
        let swipes = InMemorySwipeRepository::new();
        swipes
            .record("room", "alice", "pizza", Direction::Like)
            .await
            .unwrap();
        swipes
            .record("room", "alice", "sushi", Direction::Pass)
            .await
            .unwrap();
        swipes
            .record("room", "bob", "ramen", Direction::Like)
            .await
            .unwrap();

        let ids = swipes.swiped_food_ids("room", "alice").await.unwrap();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains("pizza"));
        assert!(ids.contains("sushi"));
    }

    #[tokio::test]
    async fn test_create_match_is_insert_if_absent_and_flips_room() {
        let repos = InMemoryRepositories::new(&[]);
        let room = Room::new("ABCDEF");
        repos.rooms.create_room(&room).await.unwrap();

        let first = repos
            .matches
            .create_match(&Match::new(&room.id, "pizza"))
            .await
            .unwrap();
        let second = repos
            .matches
            .create_match(&Match::new(&room.id, "sushi"))
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
        assert_eq!(repos.matches.match_count().await, 1);
        let stored = repos.rooms.get_room_by_id(&room.id).await.unwrap();
        assert_eq!(stored.status, RoomStatus::Matched);
        assert_eq!(stored.matched_food_id.as_deref(), Some("pizza"));
    }

    #[tokio::test]
    async fn test_create_room_rejects_a_taken_code() {
        let rooms = InMemoryRoomRepository::new();
        rooms.create_room(&Room::new("ABC123")).await.unwrap();

        let result = rooms.create_room(&Room::new("ABC123")).await;

        assert!(matches!(result, Err(RoomRepositoryError::CodeTaken(code)) if code == "ABC123"));
        assert!(rooms.code_exists("ABC123").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_match_for_missing_room_is_rejected() {
        let repos = InMemoryRepositories::new(&[]);

        let created = repos
            .matches
            .create_match(&Match::new("nowhere", "pizza"))
            .await
            .unwrap();

        assert!(!created);
        assert_eq!(repos.matches.match_count().await, 0);
    }

    #[tokio::test]
    async fn test_food_catalog_keeps_given_order() {
        let foods = InMemoryFoodRepository::with_names(&["Pizza", "Sushi", "Burger"]);

        let names: Vec<String> = foods
            .list_foods()
            .await
            .unwrap()
            .into_iter()
            .map(|food| food.name)
            .collect();

        assert_eq!(names, vec!["Pizza", "Sushi", "Burger"]);
    }

    #[tokio::test]
    async fn test_gone_connection_reports_false() {
        let connections = InMemoryWebSocketRepository::new();
        connections.drop_connection("conn-1").await;

        assert!(!connections.send_message("conn-1", "hi").await.unwrap());
        assert!(connections.send_message("conn-2", "hi").await.unwrap());
        assert_eq!(connections.sent_messages().await.len(), 1);
    }
}
