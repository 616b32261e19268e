pub mod catalog_service_errors;
pub mod matching_service_errors;
pub mod notifier_errors;
pub mod room_service_errors;
pub mod room_session_errors;
pub mod session_store_errors;
