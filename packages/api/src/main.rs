use lambda_http::{run, tracing, Error};
use std::env::set_var;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod routes;
pub mod state;

use shared::config::{websocket_endpoint, TableConfig};
use shared::repositories::food_repository::DynamoDbFoodRepository;
use shared::repositories::match_repository::DynamoDbMatchRepository;
use shared::repositories::participant_repository::DynamoDbParticipantRepository;
use shared::repositories::room_repository::DynamoDbRoomRepository;
use shared::repositories::swipe_repository::DynamoDbSwipeRepository;
use shared::repositories::websocket_repository::DynamoDbWebSocketRepository;
use shared::services::catalog_service::CatalogService;
use shared::services::matching_service::MatchingService;
use shared::services::room_service::RoomService;
use shared::services::websocket_service::WebSocketService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let tables = TableConfig::from_env()?;
    let websocket_endpoint = websocket_endpoint()?;

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_dynamodb::Client::new(&config);
    let api_gateway_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
        .endpoint_url(&websocket_endpoint)
        .build();
    let api_gateway_client = aws_sdk_apigatewaymanagement::Client::from_conf(api_gateway_config);

    let room_service = Arc::new(RoomService::new(
        Arc::new(DynamoDbRoomRepository::new(client.clone(), &tables)),
        Arc::new(DynamoDbParticipantRepository::new(client.clone(), &tables)),
    ));
    let catalog_service = Arc::new(CatalogService::new(Arc::new(DynamoDbFoodRepository::new(
        client.clone(),
        &tables,
    ))));

    // Match events go out to every websocket connection watching the room.
    let notifier = Arc::new(WebSocketService::new(Arc::new(
        DynamoDbWebSocketRepository::new(client.clone(), api_gateway_client, &tables),
    )));
    let matching_service = Arc::new(MatchingService::new(
        Arc::new(DynamoDbSwipeRepository::new(client.clone(), &tables)),
        Arc::new(DynamoDbMatchRepository::new(client, &tables)),
        notifier,
    ));

    let app_state = state::AppState {
        room_service,
        catalog_service,
        matching_service,
    };

    // ToDo: Tighten this up once the frontend origin is fixed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::app(app_state).layer(cors);

    run(app).await
}
