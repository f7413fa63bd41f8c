use axum::{extract::State, http::HeaderMap, Json};
use tracing::{info, instrument};

use super::types::bearer_token;
use crate::shared::{ApiJson, AppError, AppState};
use crate::user::types::{AuthResponse, StatusResponse, UsernameRequest};

/// HTTP handler for creating an account
///
/// POST /api/register
/// Returns the new user and a session token
#[instrument(name = "register", skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UsernameRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.user_service.register(&request.username).await?;
    let token = state.session_service.create_session(&user.id).await?;

    info!(user_id = %user.id, "Registered and logged in");
    Ok(Json(AuthResponse { user, token }))
}

/// HTTP handler for logging in to an existing account
///
/// POST /api/login
/// Returns the user and a new session token; earlier tokens stay valid
#[instrument(name = "login", skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UsernameRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .user_service
        .find_by_username(&request.username)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let token = state.session_service.create_session(&user.id).await?;

    info!(user_id = %user.id, "Logged in");
    Ok(Json(AuthResponse { user, token }))
}

/// HTTP handler for ending the caller's session
///
/// POST /api/logout
/// Always succeeds, even without a valid token
#[instrument(name = "logout", skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.session_service.revoke(&token).await?;
    }

    Ok(Json(StatusResponse::ok()))
}
