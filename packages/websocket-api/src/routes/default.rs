use lambda_runtime::Error;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::routes::response;
use crate::state::AppState;

fn error_frame(message: &str) -> Value {
    json!({
        "action": "error",
        "message": message,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Clients only ever send `ping`; match events flow the other way.
pub async fn handle_default_message(
    connection_id: &str,
    body: Option<&str>,
    state: &AppState,
) -> Result<Value, Error> {
    let message: Value = match body.map(serde_json::from_str::<Value>) {
        Some(Ok(message)) => message,
        Some(Err(e)) => {
            debug!("Invalid JSON from connection {}: {}", connection_id, e);
            return Ok(response(400, Some(error_frame("Invalid JSON format"))));
        }
        None => return Ok(response(400, Some(error_frame("Empty message")))),
    };

    match message.get("action").and_then(|action| action.as_str()) {
        Some("ping") => {
            let pong = json!({
                "action": "pong",
                "timestamp": chrono::Utc::now().to_rfc3339()
            });
            if let Err(e) = state
                .websocket_service
                .send_message(connection_id, &pong.to_string())
                .await
            {
                error!("Failed to send pong to {}: {}", connection_id, e);
                return Ok(response(
                    500,
                    Some(json!({"error": "Failed to send response"})),
                ));
            }
            Ok(response(200, None))
        }
        Some(action) => {
            debug!("Unknown action {} from {}", action, connection_id);
            Ok(response(
                400,
                Some(error_frame(&format!("Unknown action: {}", action))),
            ))
        }
        None => Ok(response(400, Some(error_frame("Missing action")))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::in_memory_state;

    #[tokio::test]
    async fn test_ping_is_answered_with_pong() {
        let (state, repos) = in_memory_state();

        let result = handle_default_message("conn-1", Some(r#"{"action":"ping"}"#), &state)
            .await
            .unwrap();

        assert_eq!(result["statusCode"], 200);
        let sent = repos.connections.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "conn-1");
        let frame: Value = serde_json::from_str(&sent[0].1).unwrap();
        assert_eq!(frame["action"], "pong");
    }

    #[tokio::test]
    async fn test_unknown_action_gets_error_frame() {
        let (state, _) = in_memory_state();

        let result = handle_default_message("conn-1", Some(r#"{"action":"dance"}"#), &state)
            .await
            .unwrap();

        assert_eq!(result["statusCode"], 400);
        let body: Value = serde_json::from_str(result["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["action"], "error");
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let (state, _) = in_memory_state();

        let result = handle_default_message("conn-1", Some("not json"), &state)
            .await
            .unwrap();

        assert_eq!(result["statusCode"], 400);
    }
}
