use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::SessionModel;
use crate::shared::AppError;

/// Trait for session repository operations
#[async_trait]
pub trait SessionRepository {
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn get_session(&self, token: &str) -> Result<Option<SessionModel>, AppError>;
    /// Removes a session, returning whether it existed
    async fn delete_session(&self, token: &str) -> Result<bool, AppError>;
}

/// In-memory implementation of SessionRepository
///
/// Sessions are never persisted; they live for the lifetime of the process.
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, SessionModel>>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the current number of sessions in the repository
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            warn!("Session token collision");
            return Err(AppError::Internal("Session token collision".to_string()));
        }
        sessions.insert(session.token.clone(), session.clone());

        debug!("Session created in memory");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn get_session(&self, token: &str) -> Result<Option<SessionModel>, AppError> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token).cloned();

        match &session {
            Some(s) => debug!(user_id = %s.user_id, "Session found in memory"),
            None => debug!("Session not found in memory"),
        }

        Ok(session)
    }

    #[instrument(skip(self, token))]
    async fn delete_session(&self, token: &str) -> Result<bool, AppError> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token);

        match &removed {
            Some(s) => debug!(user_id = %s.user_id, "Session deleted from memory"),
            None => debug!("Session not found for deletion"),
        }

        Ok(removed.is_some())
    }
}
