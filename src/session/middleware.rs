use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use super::types::{bearer_token, AuthenticatedUser};
use crate::shared::{AppError, AppState};

/// Session authentication middleware - resolves the Authorization token and adds
/// `AuthenticatedUser` to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::require_auth))
/// Handlers can then extract Extension(caller): Extension<AuthenticatedUser>.
#[instrument(skip(state, req, next), fields(uri = %req.uri()))]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or_else(|| {
        warn!("Missing Authorization header in request");
        AppError::Unauthorized("Not authenticated".to_string())
    })?;

    let user_id = state.session_service.resolve(&token).await?;

    // Handlers must never see an id the user registry cannot resolve
    let user = state.user_service.get_user(&user_id).await.ok_or_else(|| {
        warn!(user_id = %user_id, "Session refers to unknown user");
        AppError::Unauthorized("Not authenticated".to_string())
    })?;

    debug!(user_id = %user.id, username = %user.username, "Authentication successful");

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        token,
    });

    Ok(next.run(req).await)
}
