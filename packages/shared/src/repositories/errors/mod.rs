pub mod food_repository_errors;
pub mod match_repository_errors;
pub mod participant_repository_errors;
pub mod room_repository_errors;
pub mod swipe_repository_errors;
pub mod websocket_repository_errors;
