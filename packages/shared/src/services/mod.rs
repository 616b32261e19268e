pub mod catalog_service;
pub mod errors;
pub mod matching_service;
pub mod notifier;
pub mod room_service;
pub mod room_session;
pub mod session_store;
pub mod simulation;
pub mod websocket_service;
