use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

use crate::config::TableConfig;
use crate::models::participant::Participant;
use crate::repositories::errors::participant_repository_errors::ParticipantRepositoryError;

pub struct DynamoDbParticipantRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbParticipantRepository {
    pub fn new(client: Client, config: &TableConfig) -> Self {
        Self {
            client,
            table_name: config.participants_table.clone(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn create_participant(
        &self,
        participant: &Participant,
    ) -> Result<(), ParticipantRepositoryError>;

    async fn get_participant(
        &self,
        participant_id: &str,
    ) -> Result<Participant, ParticipantRepositoryError>;

    /// Participants of a room, earliest joiner first.
    async fn list_participants(
        &self,
        room_id: &str,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError>;
}

#[async_trait]
impl ParticipantRepository for DynamoDbParticipantRepository {
    async fn create_participant(
        &self,
        participant: &Participant,
    ) -> Result<(), ParticipantRepositoryError> {
        let item = to_item(participant)
            .map_err(|e| ParticipantRepositoryError::Serialization(e.to_string()))?;
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| ParticipantRepositoryError::DynamoDb(e.to_string()))?;
        Ok(())
    }

    async fn get_participant(
        &self,
        participant_id: &str,
    ) -> Result<Participant, ParticipantRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(participant_id)
                    .map_err(|e| ParticipantRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ParticipantRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => from_item(item)
                .map_err(|e| ParticipantRepositoryError::Serialization(e.to_string())),
            None => Err(ParticipantRepositoryError::NotFound),
        }
    }

    async fn list_participants(
        &self,
        room_id: &str,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("GSI_ParticipantsByRoom")
            .key_condition_expression("room_id = :room_id")
            .expression_attribute_values(
                ":room_id",
                to_attribute_value(room_id)
                    .map_err(|e| ParticipantRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| ParticipantRepositoryError::DynamoDb(e.to_string()))?;

        let mut participants = Vec::new();
        for item in output.items.unwrap_or_default() {
            let participant: Participant = from_item(item)
                .map_err(|e| ParticipantRepositoryError::Serialization(e.to_string()))?;
            participants.push(participant);
        }

        participants.sort_by_key(|participant| participant.joined_at);
        Ok(participants)
    }
}
