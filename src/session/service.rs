use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{models::SessionModel, repository::SessionRepository, token::generate_token};
use crate::shared::AppError;

/// Service for handling session business logic
pub struct SessionService {
    repository: Arc<dyn SessionRepository + Send + Sync>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Opens a new session for `user_id` and returns its token.
    /// A user may hold any number of live sessions.
    #[instrument(skip(self))]
    pub async fn create_session(&self, user_id: &str) -> Result<String, AppError> {
        let session = SessionModel::new(generate_token(), user_id.to_string());
        self.repository.create_session(&session).await?;

        info!(user_id = %user_id, "Session created");
        Ok(session.token)
    }

    /// Resolves a token to the user id it belongs to
    #[instrument(skip(self, token))]
    pub async fn resolve(&self, token: &str) -> Result<String, AppError> {
        match self.repository.get_session(token).await? {
            Some(session) => Ok(session.user_id),
            None => {
                warn!("Unknown or revoked session token");
                Err(AppError::Unauthorized("Not authenticated".to_string()))
            }
        }
    }

    /// Ends a session. Unknown tokens are ignored.
    #[instrument(skip(self, token))]
    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        if self.repository.delete_session(token).await? {
            info!("Session revoked");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::repository::InMemorySessionRepository;

    fn service() -> SessionService {
        SessionService::new(Arc::new(InMemorySessionRepository::new()))
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let service = service();
        let token = service.create_session("user-1").await.unwrap();

        assert_eq!(service.resolve(&token).await.unwrap(), "user-1");
    }

    #[tokio::test]
    async fn test_each_login_gets_a_distinct_token() {
        let service = service();
        let first = service.create_session("user-1").await.unwrap();
        let second = service.create_session("user-1").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(service.resolve(&first).await.unwrap(), "user-1");
        assert_eq!(service.resolve(&second).await.unwrap(), "user-1");
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let service = service();
        let result = service.resolve("not-a-token").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_revoke_ends_only_that_session() {
        let service = service();
        let first = service.create_session("user-1").await.unwrap();
        let second = service.create_session("user-1").await.unwrap();

        service.revoke(&first).await.unwrap();

        assert!(service.resolve(&first).await.is_err());
        assert!(service.resolve(&second).await.is_ok());
        // Revoking again is fine
        assert!(service.revoke(&first).await.is_ok());
    }
}
