use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::room::{RoomConfig, RoomService};
use crate::session::{repository::InMemorySessionRepository, SessionService};
use crate::user::{StoreError, UserService, UserStore};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub session_service: Arc<SessionService>,
    pub room_service: Arc<RoomService>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        session_service: Arc<SessionService>,
        room_service: Arc<RoomService>,
    ) -> Self {
        Self {
            user_service,
            session_service,
            room_service,
        }
    }

    /// Wires the registries together, loading users from `user_store`
    pub async fn build(
        user_store: Arc<dyn UserStore>,
        room_config: RoomConfig,
    ) -> Result<Self, StoreError> {
        let user_service = Arc::new(UserService::load(user_store).await?);
        let session_service = Arc::new(SessionService::new(Arc::new(
            InMemorySessionRepository::new(),
        )));
        let room_service = Arc::new(RoomService::new(user_service.clone(), room_config));

        Ok(Self::new(user_service, session_service, room_service))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => {
                error!(error = %msg, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        AppError::BadRequest("Invalid request body".to_string())
    }
}

/// `Json` extractor whose failures render as `AppError` bodies
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::user::InMemoryUserStore;
    use axum::body::to_bytes;
    use serde::de::DeserializeOwned;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        user_store: Option<Arc<dyn UserStore>>,
        room_config: RoomConfig,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                user_store: None,
                room_config: RoomConfig::default(),
            }
        }

        pub fn with_user_store(mut self, store: Arc<dyn UserStore>) -> Self {
            self.user_store = Some(store);
            self
        }

        pub fn with_room_config(mut self, config: RoomConfig) -> Self {
            self.room_config = config;
            self
        }

        pub async fn build(self) -> AppState {
            let store = self
                .user_store
                .unwrap_or_else(|| Arc::new(InMemoryUserStore::new()));
            AppState::build(store, self.room_config)
                .await
                .expect("test user store should load")
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Reads a response body as JSON
    pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
