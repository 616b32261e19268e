use aws_lambda_events::apigw::ApiGatewayWebsocketProxyRequest;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

pub mod routes;
pub mod state;

use shared::config::{websocket_endpoint, TableConfig};
use shared::repositories::participant_repository::DynamoDbParticipantRepository;
use shared::repositories::room_repository::DynamoDbRoomRepository;
use shared::repositories::websocket_repository::DynamoDbWebSocketRepository;
use shared::services::room_service::RoomService;
use shared::services::websocket_service::WebSocketService;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();

    let tables = TableConfig::from_env()?;
    let websocket_endpoint = websocket_endpoint()?;

    let config = aws_config::load_from_env().await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);
    let api_gateway_config = aws_sdk_apigatewaymanagement::config::Builder::from(&config)
        .endpoint_url(&websocket_endpoint)
        .build();
    let api_gateway_client = aws_sdk_apigatewaymanagement::Client::from_conf(api_gateway_config);

    let websocket_repository = Arc::new(DynamoDbWebSocketRepository::new(
        dynamodb_client.clone(),
        api_gateway_client,
        &tables,
    ));
    let room_service = Arc::new(RoomService::new(
        Arc::new(DynamoDbRoomRepository::new(dynamodb_client.clone(), &tables)),
        Arc::new(DynamoDbParticipantRepository::new(dynamodb_client, &tables)),
    ));

    let app_state = state::AppState {
        websocket_service: Arc::new(WebSocketService::new(websocket_repository)),
        room_service,
    };

    run(service_fn(
        |event: LambdaEvent<ApiGatewayWebsocketProxyRequest>| {
            routes::dispatch(event.payload, app_state.clone())
        },
    ))
    .await
}
