use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use crate::{
    models::{
        participant::Participant,
        room::{normalize_code, Room},
        session::LocalSession,
    },
    repositories::{
        errors::{
            participant_repository_errors::ParticipantRepositoryError,
            room_repository_errors::RoomRepositoryError,
        },
        participant_repository::ParticipantRepository,
        room_repository::RoomRepository,
    },
    services::{errors::room_service_errors::RoomServiceError, session_store::SessionStore},
};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CODE_LENGTH: usize = 6;
const MAX_CODE_ATTEMPTS: usize = 5;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 24;

#[derive(Clone)]
pub struct RoomService {
    rooms: Arc<dyn RoomRepository + Send + Sync>,
    participants: Arc<dyn ParticipantRepository + Send + Sync>,
}

impl RoomService {
    pub fn new(
        rooms: Arc<dyn RoomRepository + Send + Sync>,
        participants: Arc<dyn ParticipantRepository + Send + Sync>,
    ) -> Self {
        RoomService {
            rooms,
            participants,
        }
    }

    pub async fn create_room(&self) -> Result<Room, RoomServiceError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_room_code();
            if self.rooms.code_exists(&code).await? {
                warn!("Room code {} taken (attempt {})", code, attempt);
                continue;
            }

            let room = Room::new(&code);
            match self.rooms.create_room(&room).await {
                Ok(()) => {
                    info!("Created room {} with code {}", room.id, room.code);
                    return Ok(room);
                }
                Err(RoomRepositoryError::CodeTaken(code)) => {
                    warn!("Room code {} claimed concurrently (attempt {})", code, attempt);
                    continue;
                }
                Err(RoomRepositoryError::AlreadyExists) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(RoomServiceError::CodeGenerationExhausted)
    }

    /// Case-insensitive lookup.
    pub async fn find_by_code(&self, code: &str) -> Result<Room, RoomServiceError> {
        let code = normalize_code(code);
        match self.rooms.get_room_by_code(&code).await {
            Ok(room) => Ok(room),
            Err(RoomRepositoryError::NotFound) => Err(RoomServiceError::RoomNotFound(code)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn join_room(
        &self,
        code: &str,
        display_name: &str,
    ) -> Result<Participant, RoomServiceError> {
        let display_name = validate_display_name(display_name)?;
        let room = self.find_by_code(code).await?;

        let participant = Participant::new(&room.id, &display_name);
        self.participants.create_participant(&participant).await?;
        info!(
            "{} joined room {} as {}",
            participant.display_name, room.code, participant.id
        );
        Ok(participant)
    }

    /// Restores an existing identity; fails if the participant belongs to another room.
    pub async fn rejoin_room(
        &self,
        code: &str,
        user_id: &str,
    ) -> Result<Participant, RoomServiceError> {
        let room = self.find_by_code(code).await?;
        let participant = self.get_participant(user_id).await?;
        if participant.room_id != room.id {
            return Err(RoomServiceError::ParticipantNotFound(user_id.to_string()));
        }
        info!("{} rejoined room {}", participant.id, room.code);
        Ok(participant)
    }

    pub async fn get_participant(&self, user_id: &str) -> Result<Participant, RoomServiceError> {
        match self.participants.get_participant(user_id).await {
            Ok(participant) => Ok(participant),
            Err(ParticipantRepositoryError::NotFound) => {
                Err(RoomServiceError::ParticipantNotFound(user_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_participants(
        &self,
        room_id: &str,
    ) -> Result<Vec<Participant>, RoomServiceError> {
        self.participants
            .list_participants(room_id)
            .await
            .map_err(RoomServiceError::from)
    }

    /// Joins and remembers the identity so a later `resume_session` can restore it.
    pub async fn join_and_remember(
        &self,
        sessions: &dyn SessionStore,
        code: &str,
        display_name: &str,
    ) -> Result<Participant, RoomServiceError> {
        let participant = self.join_room(code, display_name).await?;
        let session = LocalSession::new(
            &normalize_code(code),
            &participant.id,
            &participant.display_name,
        );
        sessions.save(&session).await?;
        Ok(participant)
    }

    /// The stored participant for `code`, if the stored session is for that room.
    pub async fn resume_session(
        &self,
        sessions: &dyn SessionStore,
        code: &str,
    ) -> Result<Option<Participant>, RoomServiceError> {
        let session = match sessions.load().await? {
            Some(session) if session.room_code == normalize_code(code) => session,
            _ => return Ok(None),
        };

        match self.rejoin_room(code, &session.user_id).await {
            Ok(participant) => Ok(Some(participant)),
            Err(RoomServiceError::ParticipantNotFound(_)) => {
                warn!(
                    "Stored session for {} no longer matches room {}",
                    session.user_id, session.room_code
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn exit_session(&self, sessions: &dyn SessionStore) -> Result<(), RoomServiceError> {
        sessions.clear().await?;
        Ok(())
    }
}

pub fn generate_room_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Trimmed name, or a validation error when it is empty or too long.
pub fn validate_display_name(display_name: &str) -> Result<String, RoomServiceError> {
    let name = display_name.trim();
    if name.is_empty() {
        return Err(RoomServiceError::ValidationError(
            "Display name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
        return Err(RoomServiceError::ValidationError(format!(
            "Display name cannot be longer than {} characters",
            MAX_DISPLAY_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}
