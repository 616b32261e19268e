use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    models::{
        matches::Match,
        swipe::{Direction, SwipeOutcome},
    },
    repositories::{
        errors::swipe_repository_errors::SwipeRepositoryError, match_repository::MatchRepository,
        swipe_repository::SwipeRepository,
    },
    services::{errors::matching_service_errors::MatchingServiceError, notifier::MatchNotifier},
};

/// Evaluates swipes against the room's like-state. The match store's insert-if-absent is
/// the only arbiter when two participants discover the same mutual like at once.
#[derive(Clone)]
pub struct MatchingService {
    swipes: Arc<dyn SwipeRepository + Send + Sync>,
    matches: Arc<dyn MatchRepository + Send + Sync>,
    notifier: Arc<dyn MatchNotifier + Send + Sync>,
}

impl MatchingService {
    pub fn new(
        swipes: Arc<dyn SwipeRepository + Send + Sync>,
        matches: Arc<dyn MatchRepository + Send + Sync>,
        notifier: Arc<dyn MatchNotifier + Send + Sync>,
    ) -> Self {
        MatchingService {
            swipes,
            matches,
            notifier,
        }
    }

    pub async fn submit_swipe(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
        direction: Direction,
    ) -> Result<SwipeOutcome, MatchingServiceError> {
        if let Some(existing) = self.matches.get_match(room_id).await? {
            debug!(
                "Room {} already matched on {}, ignoring swipe by {}",
                room_id, existing.food_id, user_id
            );
            return Ok(SwipeOutcome::AlreadyMatched {
                food_id: existing.food_id,
            });
        }

        let direction = self
            .record_swipe(room_id, user_id, food_id, direction)
            .await?;
        debug!(
            "User {} swiped {:?} on {} in room {}",
            user_id, direction, food_id, room_id
        );

        if direction == Direction::Pass {
            return Ok(SwipeOutcome::NoMatch);
        }

        if !self
            .swipes
            .has_opposing_like(room_id, food_id, user_id)
            .await?
        {
            return Ok(SwipeOutcome::NoMatch);
        }

        let record = Match::new(room_id, food_id);
        if self.matches.create_match(&record).await? {
            info!("Room {} matched on food {}", room_id, food_id);
            if let Err(e) = self.notifier.publish(&record.event()).await {
                warn!("Failed to publish match for room {}: {}", room_id, e);
            }
            return Ok(SwipeOutcome::Matched {
                food_id: record.food_id,
                won: true,
            });
        }

        // Lost the race; whoever won already published.
        match self.matches.get_match(room_id).await? {
            Some(existing) => {
                info!(
                    "Room {} was matched on {} by a concurrent swipe",
                    room_id, existing.food_id
                );
                Ok(SwipeOutcome::Matched {
                    food_id: existing.food_id,
                    won: false,
                })
            }
            None => Err(MatchingServiceError::RoomNotFound(room_id.to_string())),
        }
    }

    /// Records the swipe and returns the direction that is now on the ledger.
    async fn record_swipe(
        &self,
        room_id: &str,
        user_id: &str,
        food_id: &str,
        direction: Direction,
    ) -> Result<Direction, MatchingServiceError> {
        match self
            .swipes
            .record(room_id, user_id, food_id, direction)
            .await
        {
            Ok(swipe) => Ok(swipe.direction),
            Err(SwipeRepositoryError::Conflict) => {
                let stored = self
                    .swipes
                    .get_swipe(room_id, user_id, food_id)
                    .await?
                    .ok_or_else(|| MatchingServiceError::MissingSwipe {
                        room_id: room_id.to_string(),
                        user_id: user_id.to_string(),
                        food_id: food_id.to_string(),
                    })?;
                warn!(
                    "Duplicate swipe by {} on {} in room {}, keeping stored {:?}",
                    user_id, food_id, room_id, stored.direction
                );
                Ok(stored.direction)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_match(&self, room_id: &str) -> Result<Option<Match>, MatchingServiceError> {
        self.matches
            .get_match(room_id)
            .await
            .map_err(MatchingServiceError::from)
    }

    pub async fn swiped_food_ids(
        &self,
        room_id: &str,
        user_id: &str,
    ) -> Result<HashSet<String>, MatchingServiceError> {
        self.swipes
            .swiped_food_ids(room_id, user_id)
            .await
            .map_err(MatchingServiceError::from)
    }
}
