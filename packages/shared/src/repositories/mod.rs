pub mod errors;
pub mod food_repository;
pub mod in_memory;
pub mod match_repository;
pub mod participant_repository;
pub mod room_repository;
pub mod swipe_repository;
pub mod websocket_repository;
