use std::sync::Arc;

use shared::services::catalog_service::CatalogService;
use shared::services::matching_service::MatchingService;
use shared::services::room_service::RoomService;

#[derive(Clone)]
pub struct AppState {
    pub room_service: Arc<RoomService>,
    pub catalog_service: Arc<CatalogService>,
    pub matching_service: Arc<MatchingService>,
}
