//! Single-process, two-role variant: both participants share one screen and take turns,
//! driven through the same room session and matching engine as the networked shape.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use crate::{
    models::{
        food::Food,
        matches::MatchEvent,
        participant::Participant,
        swipe::{Direction, SwipeOutcome},
    },
    repositories::in_memory::InMemoryRepositories,
    services::{
        catalog_service::CatalogService,
        errors::room_session_errors::RoomSessionError,
        matching_service::MatchingService,
        notifier::InMemoryMatchNotifier,
        room_service::RoomService,
        room_session::{RoomSession, RoomState},
    },
};

pub const DEFAULT_FOODS: [&str; 10] = [
    "Pizza",
    "Sushi",
    "Burger",
    "Ramen",
    "Samgyupsal",
    "Fried Chicken",
    "Tacos",
    "Pasta",
    "Steak",
    "Hotpot",
];

pub const ROLE_NAMES: [&str; 2] = ["User 1", "User 2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    InProgress,
    Matched,
    /// Both roles went through the whole deck without a mutual like.
    Exhausted,
}

pub struct Simulation {
    food_names: Vec<String>,
    session: RoomSession,
    roles: Vec<Participant>,
    turn: usize,
    events: broadcast::Receiver<MatchEvent>,
}

impl Simulation {
    pub async fn new() -> Result<Self, RoomSessionError> {
        Self::with_foods(&DEFAULT_FOODS).await
    }

    pub async fn with_foods(food_names: &[&str]) -> Result<Self, RoomSessionError> {
        let repos = InMemoryRepositories::new(food_names);
        let notifier = Arc::new(InMemoryMatchNotifier::new());
        let rooms = RoomService::new(repos.rooms.clone(), repos.participants.clone());
        let catalog = CatalogService::new(repos.foods.clone());
        let matching = MatchingService::new(
            repos.swipes.clone(),
            repos.matches.clone(),
            notifier.clone(),
        );

        let room = rooms.create_room().await?;
        let mut roles = Vec::with_capacity(ROLE_NAMES.len());
        for name in ROLE_NAMES {
            roles.push(rooms.join_room(&room.code, name).await?);
        }
        let events = notifier.subscribe(&room.id).await;
        let session = RoomSession::load(&room.code, &rooms, &catalog, &matching).await?;

        info!(
            "Simulation started in room {} with {} foods",
            room.code,
            food_names.len()
        );
        Ok(Simulation {
            food_names: food_names.iter().map(|name| name.to_string()).collect(),
            session,
            roles,
            turn: 0,
            events,
        })
    }

    /// Starts over with fresh state and the same foods.
    pub async fn reset(&mut self) -> Result<(), RoomSessionError> {
        let food_names = self.food_names.clone();
        let names: Vec<&str> = food_names.iter().map(String::as_str).collect();
        *self = Self::with_foods(&names).await?;
        Ok(())
    }

    pub fn active_role(&self) -> &Participant {
        &self.roles[self.turn]
    }

    pub fn current_food(&self) -> Option<&Food> {
        self.session
            .current_food(&self.active_role().id)
            .ok()
            .flatten()
    }

    pub fn matched_food(&self) -> Option<&Food> {
        self.session.matched_food()
    }

    pub fn session(&self) -> &RoomSession {
        &self.session
    }

    pub fn status(&self) -> SimulationStatus {
        if self.session.state() == RoomState::Matched {
            SimulationStatus::Matched
        } else if self.roles.iter().all(|role| self.is_exhausted(&role.id)) {
            SimulationStatus::Exhausted
        } else {
            SimulationStatus::InProgress
        }
    }

    fn is_exhausted(&self, user_id: &str) -> bool {
        self.session.is_exhausted(user_id).unwrap_or(true)
    }

    /// The active role swipes its current card. Once the simulation is over, swipes are
    /// ignored and report the final state.
    pub async fn swipe(&mut self, direction: Direction) -> Result<SwipeOutcome, RoomSessionError> {
        match self.status() {
            SimulationStatus::Matched => {
                let food_id = self
                    .matched_food()
                    .map(|food| food.id.clone())
                    .unwrap_or_default();
                return Ok(SwipeOutcome::AlreadyMatched { food_id });
            }
            SimulationStatus::Exhausted => return Ok(SwipeOutcome::NoMatch),
            SimulationStatus::InProgress => {}
        }

        let user_id = self.active_role().id.clone();
        let outcome = self.session.swipe(&user_id, direction).await?;
        self.drain_events().await?;

        if self.is_exhausted(&user_id) {
            let next = (self.turn + 1) % self.roles.len();
            if !self.is_exhausted(&self.roles[next].id) {
                info!(
                    "{} reached the end of the deck, {} takes over",
                    self.roles[self.turn].display_name, self.roles[next].display_name
                );
                self.turn = next;
            }
        }
        Ok(outcome)
    }

    async fn drain_events(&mut self) -> Result<(), RoomSessionError> {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.session.apply_match_event(&event).await?;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Skipped {} match events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn swipe_all(simulation: &mut Simulation, directions: &[Direction]) {
        for direction in directions {
            simulation.swipe(*direction).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_starts_with_user_one_on_the_first_food() {
        let simulation = Simulation::new().await.unwrap();

        assert_eq!(simulation.active_role().display_name, "User 1");
        assert_eq!(simulation.current_food().unwrap().name, "Pizza");
        assert_eq!(simulation.session().catalog().len(), DEFAULT_FOODS.len());
        assert_eq!(simulation.status(), SimulationStatus::InProgress);
    }

    #[tokio::test]
    async fn test_turn_passes_when_the_deck_runs_out() {
        let mut simulation = Simulation::with_foods(&["Pizza", "Sushi"]).await.unwrap();

        swipe_all(&mut simulation, &[Direction::Like, Direction::Pass]).await;

        assert_eq!(simulation.active_role().display_name, "User 2");
        assert_eq!(simulation.current_food().unwrap().name, "Pizza");
    }

    #[tokio::test]
    async fn test_second_role_matches_on_a_shared_like() {
        let mut simulation = Simulation::with_foods(&["Pizza", "Sushi"]).await.unwrap();
        swipe_all(&mut simulation, &[Direction::Pass, Direction::Like]).await;

        let pizza = simulation.swipe(Direction::Like).await.unwrap();
        let sushi = simulation.swipe(Direction::Like).await.unwrap();

        assert_eq!(pizza, SwipeOutcome::NoMatch);
        assert!(matches!(sushi, SwipeOutcome::Matched { won: true, .. }));
        assert_eq!(simulation.status(), SimulationStatus::Matched);
        assert_eq!(simulation.matched_food().unwrap().name, "Sushi");

        let ignored = simulation.swipe(Direction::Like).await.unwrap();
        assert!(matches!(ignored, SwipeOutcome::AlreadyMatched { .. }));
    }

    #[tokio::test]
    async fn test_no_shared_like_exhausts_both_decks() {
        let mut simulation = Simulation::with_foods(&["Pizza", "Sushi"]).await.unwrap();

        swipe_all(
            &mut simulation,
            &[
                Direction::Like,
                Direction::Pass,
                Direction::Pass,
                Direction::Like,
            ],
        )
        .await;

        assert_eq!(simulation.status(), SimulationStatus::Exhausted);
        assert_eq!(
            simulation.swipe(Direction::Like).await.unwrap(),
            SwipeOutcome::NoMatch
        );
    }

    #[tokio::test]
    async fn test_reset_starts_over() {
        let mut simulation = Simulation::with_foods(&["Pizza"]).await.unwrap();
        swipe_all(&mut simulation, &[Direction::Like, Direction::Like]).await;
        assert_eq!(simulation.status(), SimulationStatus::Matched);

        simulation.reset().await.unwrap();

        assert_eq!(simulation.status(), SimulationStatus::InProgress);
        assert_eq!(simulation.active_role().display_name, "User 1");
        assert!(simulation.matched_food().is_none());
        assert_eq!(simulation.current_food().unwrap().name, "Pizza");
    }
}
