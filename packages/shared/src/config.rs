use std::env;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingVar(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => {
                write!(f, "{} environment variable must be set", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// DynamoDB table names, read once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConfig {
    pub rooms_table: String,
    pub foods_table: String,
    pub participants_table: String,
    pub swipes_table: String,
    pub matches_table: String,
    pub room_connections_table: String,
}

impl TableConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()));

        Ok(TableConfig {
            rooms_table: var("ROOMS_TABLE")?,
            foods_table: var("FOODS_TABLE")?,
            participants_table: var("PARTICIPANTS_TABLE")?,
            swipes_table: var("SWIPES_TABLE")?,
            matches_table: var("MATCHES_TABLE")?,
            room_connections_table: var("ROOM_CONNECTIONS_TABLE")?,
        })
    }
}

/// Management endpoint of the websocket API, used to push frames to connections.
/// Format: https://{api-id}.execute-api.{region}.amazonaws.com/{stage}
pub fn websocket_endpoint() -> Result<String, ConfigError> {
    websocket_endpoint_from(|name| env::var(name).ok())
}

fn websocket_endpoint_from<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(endpoint) = lookup("WEBSOCKET_API_ENDPOINT") {
        return Ok(endpoint);
    }

    let api_id = lookup("WEBSOCKET_API_ID")
        .ok_or_else(|| ConfigError::MissingVar("WEBSOCKET_API_ENDPOINT".to_string()))?;
    let region = lookup("AWS_REGION").unwrap_or_else(|| "eu-west-1".to_string());
    let stage = lookup("STAGE").unwrap_or_else(|| "dev".to_string());

    Ok(format!(
        "https://{}.execute-api.{}.amazonaws.com/{}",
        api_id, region, stage
    ))
}
