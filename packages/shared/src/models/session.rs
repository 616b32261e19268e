use serde::{Deserialize, Serialize};

/// Identity a client keeps between page loads so it can rejoin without re-entering a name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalSession {
    pub room_code: String,
    pub user_id: String,
    pub name: String,
}

impl LocalSession {
    pub fn new(room_code: &str, user_id: &str, name: &str) -> Self {
        LocalSession {
            room_code: room_code.to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_uses_camel_case_keys() {
        let session = LocalSession::new("ABC123", "user-1", "Jess");

        let serialized = serde_json::to_string(&session).unwrap();

        assert_eq!(
            serialized,
            r#"{"roomCode":"ABC123","userId":"user-1","name":"Jess"}"#
        );
    }
}
