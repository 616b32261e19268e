use aws_lambda_events::apigw::ApiGatewayWebsocketProxyRequest;
use lambda_runtime::Error;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::state::AppState;

pub mod connection;
pub mod default;

pub fn response(status_code: u16, body: Option<Value>) -> Value {
    match body {
        Some(body) => json!({ "statusCode": status_code, "body": body.to_string() }),
        None => json!({ "statusCode": status_code }),
    }
}

pub async fn dispatch(
    event: ApiGatewayWebsocketProxyRequest,
    state: AppState,
) -> Result<Value, Error> {
    let route_key = event.request_context.route_key.as_deref().unwrap_or("");
    let connection_id = event
        .request_context
        .connection_id
        .as_deref()
        .unwrap_or("");
    debug!(
        "Processing route_key: {}, connection_id: {}",
        route_key, connection_id
    );

    match route_key {
        "$connect" => {
            let room_id = event.query_string_parameters.first("room_id");
            let user_id = event.query_string_parameters.first("user_id");
            connection::handle_connect(connection_id, room_id, user_id, &state).await
        }
        "$disconnect" => connection::handle_disconnect(connection_id, &state).await,
        "$default" => {
            default::handle_default_message(connection_id, event.body.as_deref(), &state).await
        }
        _ => {
            error!("Unknown route key: {}", route_key);
            Ok(response(400, Some(json!({"error": "Unknown route"}))))
        }
    }
}
