use serde::{Deserialize, Serialize};

use crate::models::{food::Food, swipe::SwipeOutcome};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// What a participant should be shown right now.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub food: Option<Food>,
    /// 1-based, clamped to `total`.
    pub position: usize,
    pub total: usize,
    pub exhausted: bool,
    pub matched_food: Option<Food>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwipeResponse {
    #[serde(flatten)]
    pub outcome: SwipeOutcome,
    pub card: Card,
}
