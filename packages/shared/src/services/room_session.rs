use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    models::{
        food::Food,
        matches::MatchEvent,
        participant::Participant,
        responses::Card,
        room::{Room, RoomStatus},
        swipe::{Direction, SwipeOutcome},
    },
    services::{
        catalog_service::CatalogService, errors::room_session_errors::RoomSessionError,
        matching_service::MatchingService, room_service::RoomService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// Fewer than two participants.
    Forming,
    Active,
    /// Terminal.
    Matched,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursor {
    position: usize,
    exhausted: bool,
}

/// Runtime state of one room: catalog, participants and their cursors, and the match.
///
/// Swipes take `&mut self`, so a session never has two swipes in flight.
pub struct RoomSession {
    room: Room,
    catalog: Vec<Food>,
    participants: Vec<Participant>,
    cursors: HashMap<String, Cursor>,
    matched_food: Option<Food>,
    matching: MatchingService,
    catalog_service: CatalogService,
}

impl RoomSession {
    pub fn new(
        room: Room,
        catalog: Vec<Food>,
        matching: MatchingService,
        catalog_service: CatalogService,
    ) -> Self {
        RoomSession {
            room,
            catalog,
            participants: Vec::new(),
            cursors: HashMap::new(),
            matched_food: None,
            matching,
            catalog_service,
        }
    }

    /// Resolves the room, its participants, the catalog and any existing match.
    /// Cursors start at the first card; use `restore_cursor` to resume one.
    pub async fn load(
        code: &str,
        rooms: &RoomService,
        catalog_service: &CatalogService,
        matching: &MatchingService,
    ) -> Result<Self, RoomSessionError> {
        let room = rooms.find_by_code(code).await?;
        let participants = rooms.list_participants(&room.id).await?;
        let catalog = catalog_service.list_foods().await?;
        let existing = matching.get_match(&room.id).await?;

        let mut session = RoomSession::new(room, catalog, matching.clone(), catalog_service.clone());
        for participant in participants {
            session.add_participant(participant);
        }
        if let Some(existing) = existing {
            session.set_match(&existing.food_id).await?;
        }

        debug!(
            "Loaded room {} with {} participants and {} foods",
            session.room.code,
            session.participants.len(),
            session.catalog.len()
        );
        Ok(session)
    }

    /// Registers a participant with a cursor on the first card. Re-adding is a no-op.
    pub fn add_participant(&mut self, participant: Participant) {
        if self.cursors.contains_key(&participant.id) {
            return;
        }
        self.cursors.insert(participant.id.clone(), Cursor::default());
        self.participants.push(participant);
    }

    pub fn state(&self) -> RoomState {
        if self.matched_food.is_some() || self.room.is_matched() {
            RoomState::Matched
        } else if self.participants.len() >= 2 {
            RoomState::Active
        } else {
            RoomState::Forming
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn catalog(&self) -> &[Food] {
        &self.catalog
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn matched_food(&self) -> Option<&Food> {
        self.matched_food.as_ref()
    }

    fn cursor(&self, user_id: &str) -> Result<Cursor, RoomSessionError> {
        self.cursors
            .get(user_id)
            .copied()
            .ok_or_else(|| RoomSessionError::UnknownParticipant(user_id.to_string()))
    }

    /// The card shown to `user_id`; `None` only when the catalog is empty.
    pub fn current_food(&self, user_id: &str) -> Result<Option<&Food>, RoomSessionError> {
        let cursor = self.cursor(user_id)?;
        Ok(self.catalog.get(cursor.position))
    }

    /// Whether `user_id` has swiped the last card without a match.
    pub fn is_exhausted(&self, user_id: &str) -> Result<bool, RoomSessionError> {
        Ok(self.cursor(user_id)?.exhausted)
    }

    pub fn card(&self, user_id: &str) -> Result<Card, RoomSessionError> {
        let cursor = self.cursor(user_id)?;
        let total = self.catalog.len();
        Ok(Card {
            food: self.catalog.get(cursor.position).cloned(),
            position: (cursor.position + 1).min(total),
            total,
            exhausted: cursor.exhausted,
            matched_food: self.matched_food.clone(),
        })
    }

    /// Swipes the participant's current card.
    pub async fn swipe(
        &mut self,
        user_id: &str,
        direction: Direction,
    ) -> Result<SwipeOutcome, RoomSessionError> {
        let food_id = match self.current_food(user_id)? {
            Some(food) => food.id.clone(),
            None => return Err(RoomSessionError::EmptyCatalog),
        };
        self.swipe_food(user_id, &food_id, direction).await
    }

    /// Swipes a specific food. Only a swipe of the current card moves the cursor,
    /// and nothing moves when the swipe fails.
    pub async fn swipe_food(
        &mut self,
        user_id: &str,
        food_id: &str,
        direction: Direction,
    ) -> Result<SwipeOutcome, RoomSessionError> {
        let cursor = self.cursor(user_id)?;
        if self.catalog.is_empty() {
            return Err(RoomSessionError::EmptyCatalog);
        }
        if !self.catalog.iter().any(|food| food.id == food_id) {
            return Err(RoomSessionError::FoodNotInCatalog(food_id.to_string()));
        }
        if let Some(food) = &self.matched_food {
            return Ok(SwipeOutcome::AlreadyMatched {
                food_id: food.id.clone(),
            });
        }

        let outcome = self
            .matching
            .submit_swipe(&self.room.id, user_id, food_id, direction)
            .await?;

        match outcome.matched_food_id() {
            Some(matched_food_id) => self.set_match(matched_food_id).await?,
            None => {
                if self.catalog[cursor.position].id == food_id {
                    self.advance(user_id);
                }
            }
        }
        Ok(outcome)
    }

    /// Applies a delivered match event. Returns whether the session changed; duplicates and
    /// events for other rooms are no-ops.
    pub async fn apply_match_event(&mut self, event: &MatchEvent) -> Result<bool, RoomSessionError> {
        if event.room_id != self.room.id || self.matched_food.is_some() {
            return Ok(false);
        }
        self.set_match(&event.food_id).await?;
        Ok(true)
    }

    /// Puts the cursor on the first food `user_id` has not swiped yet, for resuming after a
    /// reload. A participant who swiped everything ends on the last card, exhausted.
    pub async fn restore_cursor(&mut self, user_id: &str) -> Result<(), RoomSessionError> {
        self.cursor(user_id)?;
        let swiped = self
            .matching
            .swiped_food_ids(&self.room.id, user_id)
            .await?;

        let cursor = match self
            .catalog
            .iter()
            .position(|food| !swiped.contains(&food.id))
        {
            Some(position) => Cursor {
                position,
                exhausted: false,
            },
            None => Cursor {
                position: self.catalog.len().saturating_sub(1),
                exhausted: !self.catalog.is_empty(),
            },
        };
        self.cursors.insert(user_id.to_string(), cursor);
        Ok(())
    }

    fn advance(&mut self, user_id: &str) {
        let last = self.catalog.len().saturating_sub(1);
        if let Some(cursor) = self.cursors.get_mut(user_id) {
            if cursor.position < last {
                cursor.position += 1;
            } else {
                cursor.exhausted = true;
            }
        }
    }

    async fn set_match(&mut self, food_id: &str) -> Result<(), RoomSessionError> {
        let food = match self.catalog.iter().find(|food| food.id == food_id) {
            Some(food) => food.clone(),
            None => self.catalog_service.get_food(food_id).await?,
        };
        info!("Room {} is matched on {}", self.room.code, food.name);
        self.room.status = RoomStatus::Matched;
        self.room.matched_food_id = Some(food.id.clone());
        self.matched_food = Some(food);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::in_memory::InMemoryRepositories;
    use crate::services::notifier::InMemoryMatchNotifier;
    use std::sync::Arc;

    struct Fixture {
        repos: InMemoryRepositories,
        rooms: RoomService,
        catalog: CatalogService,
        matching: MatchingService,
    }

    fn fixture(foods: &[&str]) -> Fixture {
        let repos = InMemoryRepositories::new(foods);
        Fixture {
            rooms: RoomService::new(repos.rooms.clone(), repos.participants.clone()),
            catalog: CatalogService::new(repos.foods.clone()),
            matching: MatchingService::new(
                repos.swipes.clone(),
                repos.matches.clone(),
                Arc::new(InMemoryMatchNotifier::new()),
            ),
            repos,
        }
    }

    async fn room_with(fixture: &Fixture, names: &[&str]) -> (Room, Vec<Participant>) {
        let room = fixture.rooms.create_room().await.unwrap();
        let mut participants = Vec::new();
        for name in names {
            participants.push(fixture.rooms.join_room(&room.code, name).await.unwrap());
        }
        (room, participants)
    }

    async fn load(fixture: &Fixture, room: &Room) -> RoomSession {
        RoomSession::load(&room.code, &fixture.rooms, &fixture.catalog, &fixture.matching)
            .await
            .unwrap()
    }

    fn name_of(session: &RoomSession, user_id: &str) -> Option<String> {
        session
            .current_food(user_id)
            .unwrap()
            .map(|food| food.name.clone())
    }

    #[tokio::test]
    async fn test_state_follows_participant_count() {
        let fixture = fixture(&["Pizza"]);
        let (room, _) = room_with(&fixture, &["Alice"]).await;
        let mut session = load(&fixture, &room).await;

        assert_eq!(session.state(), RoomState::Forming);

        let bob = fixture.rooms.join_room(&room.code, "Bob").await.unwrap();
        session.add_participant(bob.clone());
        session.add_participant(bob);

        assert_eq!(session.state(), RoomState::Active);
        assert_eq!(session.participants().len(), 2);
    }

    #[tokio::test]
    async fn test_cursor_advances_and_stops_on_last_card() {
        let fixture = fixture(&["Pizza", "Sushi"]);
        let (room, people) = room_with(&fixture, &["Alice", "Bob"]).await;
        let alice = &people[0].id;
        let mut session = load(&fixture, &room).await;

        session.swipe(alice, Direction::Pass).await.unwrap();
        assert_eq!(name_of(&session, alice).as_deref(), Some("Sushi"));
        assert!(!session.is_exhausted(alice).unwrap());

        session.swipe(alice, Direction::Like).await.unwrap();
        assert_eq!(name_of(&session, alice).as_deref(), Some("Sushi"));
        assert!(session.is_exhausted(alice).unwrap());

        let card = session.card(alice).unwrap();
        assert_eq!((card.position, card.total), (2, 2));
    }

    #[tokio::test]
    async fn test_cursors_are_independent() {
        let fixture = fixture(&["Pizza", "Sushi", "Burger"]);
        let (room, people) = room_with(&fixture, &["Alice", "Bob"]).await;
        let mut session = load(&fixture, &room).await;

        session.swipe(&people[0].id, Direction::Pass).await.unwrap();
        session.swipe(&people[0].id, Direction::Pass).await.unwrap();

        assert_eq!(name_of(&session, &people[0].id).as_deref(), Some("Burger"));
        assert_eq!(name_of(&session, &people[1].id).as_deref(), Some("Pizza"));
    }

    #[tokio::test]
    async fn test_mutual_like_matches_both_participants() {
        let fixture = fixture(&["Pizza", "Sushi"]);
        let (room, people) = room_with(&fixture, &["Alice", "Bob"]).await;
        let mut session = load(&fixture, &room).await;

        let first = session.swipe(&people[0].id, Direction::Like).await.unwrap();
        let second = session.swipe(&people[1].id, Direction::Like).await.unwrap();

        assert_eq!(first, SwipeOutcome::NoMatch);
        assert_eq!(second.matched_food_id(), Some(session.catalog()[0].id.as_str()));
        assert_eq!(session.state(), RoomState::Matched);
        assert_eq!(
            session.card(&people[0].id).unwrap().matched_food.unwrap().name,
            "Pizza"
        );

        let after = session.swipe(&people[0].id, Direction::Like).await.unwrap();
        assert!(matches!(after, SwipeOutcome::AlreadyMatched { .. }));
        assert_eq!(fixture.repos.swipes.swipe_count().await, 2);
    }

    #[tokio::test]
    async fn test_empty_catalog_has_no_card_and_rejects_swipes() {
        let fixture = fixture(&[]);
        let (room, people) = room_with(&fixture, &["Alice"]).await;
        let mut session = load(&fixture, &room).await;

        assert_eq!(session.current_food(&people[0].id).unwrap(), None);
        assert!(matches!(
            session.swipe(&people[0].id, Direction::Like).await,
            Err(RoomSessionError::EmptyCatalog)
        ));
        assert_eq!(fixture.repos.swipes.swipe_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_participant_is_rejected() {
        let fixture = fixture(&["Pizza"]);
        let (room, _) = room_with(&fixture, &["Alice"]).await;
        let mut session = load(&fixture, &room).await;

        assert!(matches!(
            session.swipe("stranger", Direction::Like).await,
            Err(RoomSessionError::UnknownParticipant(_))
        ));
    }

    #[tokio::test]
    async fn test_retrying_an_earlier_card_does_not_move_the_cursor() {
        let fixture = fixture(&["Pizza", "Sushi", "Burger"]);
        let (room, people) = room_with(&fixture, &["Alice"]).await;
        let alice = &people[0].id;
        let mut session = load(&fixture, &room).await;
        let pizza = session.catalog()[0].id.clone();

        session.swipe(alice, Direction::Like).await.unwrap();
        session
            .swipe_food(alice, &pizza, Direction::Like)
            .await
            .unwrap();

        assert_eq!(name_of(&session, alice).as_deref(), Some("Sushi"));
        assert_eq!(fixture.repos.swipes.swipe_count().await, 1);
    }

    #[tokio::test]
    async fn test_restore_cursor_resumes_at_first_unswiped_food() {
        let fixture = fixture(&["Pizza", "Sushi", "Burger"]);
        let (room, people) = room_with(&fixture, &["Alice"]).await;
        let alice = &people[0].id;
        let mut session = load(&fixture, &room).await;
        session.swipe(alice, Direction::Pass).await.unwrap();
        session.swipe(alice, Direction::Pass).await.unwrap();

        let mut reloaded = load(&fixture, &room).await;
        assert_eq!(name_of(&reloaded, alice).as_deref(), Some("Pizza"));
        reloaded.restore_cursor(alice).await.unwrap();

        assert_eq!(name_of(&reloaded, alice).as_deref(), Some("Burger"));
        assert!(!reloaded.is_exhausted(alice).unwrap());
    }

    #[tokio::test]
    async fn test_restore_cursor_after_whole_deck_is_exhausted() {
        let fixture = fixture(&["Pizza", "Sushi"]);
        let (room, people) = room_with(&fixture, &["Alice"]).await;
        let alice = &people[0].id;
        let mut session = load(&fixture, &room).await;
        session.swipe(alice, Direction::Pass).await.unwrap();
        session.swipe(alice, Direction::Pass).await.unwrap();

        let mut reloaded = load(&fixture, &room).await;
        reloaded.restore_cursor(alice).await.unwrap();

        assert_eq!(name_of(&reloaded, alice).as_deref(), Some("Sushi"));
        assert!(reloaded.is_exhausted(alice).unwrap());
    }

    #[tokio::test]
    async fn test_apply_match_event_is_idempotent() {
        let fixture = fixture(&["Pizza", "Sushi"]);
        let (room, _) = room_with(&fixture, &["Alice", "Bob"]).await;
        let mut session = load(&fixture, &room).await;
        let event = MatchEvent {
            room_id: room.id.clone(),
            food_id: session.catalog()[1].id.clone(),
        };

        assert!(session.apply_match_event(&event).await.unwrap());
        assert!(!session.apply_match_event(&event).await.unwrap());
        assert_eq!(session.matched_food().unwrap().name, "Sushi");
        assert_eq!(session.state(), RoomState::Matched);
    }

    #[tokio::test]
    async fn test_apply_match_event_for_other_room_is_ignored() {
        let fixture = fixture(&["Pizza"]);
        let (room, _) = room_with(&fixture, &["Alice"]).await;
        let mut session = load(&fixture, &room).await;
        let event = MatchEvent {
            room_id: "another-room".to_string(),
            food_id: session.catalog()[0].id.clone(),
        };

        assert!(!session.apply_match_event(&event).await.unwrap());
        assert_eq!(session.state(), RoomState::Forming);
    }

    #[tokio::test]
    async fn test_load_picks_up_an_existing_match() {
        let fixture = fixture(&["Pizza", "Sushi"]);
        let (room, people) = room_with(&fixture, &["Alice", "Bob"]).await;
        let mut session = load(&fixture, &room).await;
        session.swipe(&people[0].id, Direction::Like).await.unwrap();
        session.swipe(&people[1].id, Direction::Like).await.unwrap();

        let reloaded = load(&fixture, &room).await;

        assert_eq!(reloaded.state(), RoomState::Matched);
        assert_eq!(reloaded.matched_food().unwrap().name, "Pizza");
        assert!(reloaded.room().is_matched());
    }
}
