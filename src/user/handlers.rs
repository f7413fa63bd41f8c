use axum::{extract::State, Extension, Json};
use std::str::FromStr;
use tracing::{info, instrument};

use super::{
    models::{MatchResult, User},
    types::ScoreUpdateRequest,
};
use crate::session::AuthenticatedUser;
use crate::shared::{ApiJson, AppError, AppState};

/// HTTP handler returning the caller's account
///
/// GET /api/user
#[instrument(name = "get_current_user", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<Json<User>, AppError> {
    let user = state
        .user_service
        .get_user(&caller.user_id)
        .await
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(user))
}

/// HTTP handler for reporting a single game result
///
/// POST /api/score
#[instrument(name = "update_score", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn update_score(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<ScoreUpdateRequest>,
) -> Result<Json<User>, AppError> {
    let result = MatchResult::from_str(&request.result)
        .map_err(|_| AppError::BadRequest("Invalid result type".to_string()))?;

    let user = state
        .user_service
        .record_result(&caller.user_id, result)
        .await?;

    info!(username = %user.username, result = %result, "Score updated");
    Ok(Json(user))
}

/// HTTP handler for the top players
///
/// GET /api/leaderboard
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.user_service.leaderboard().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{read_json, AppStateBuilder};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn caller_for(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: user.id.clone(),
            username: user.username.clone(),
            token: "test-token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_update_score_handler() {
        let state = AppStateBuilder::new().build().await;
        let user = state.user_service.register("alice").await.unwrap();

        let app = Router::new()
            .route("/api/score", post(update_score))
            .layer(Extension(caller_for(&user)))
            .with_state(state);

        let request = Request::builder()
            .method("POST")
            .uri("/api/score")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"result": "draw"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated: User = read_json(response).await;
        assert_eq!(updated.scores.draws, 1);
        assert_eq!(updated.scores.wins, 0);
    }

    #[tokio::test]
    async fn test_update_score_invalid_result() {
        let state = AppStateBuilder::new().build().await;
        let user = state.user_service.register("alice").await.unwrap();

        let app = Router::new()
            .route("/api/score", post(update_score))
            .layer(Extension(caller_for(&user)))
            .with_state(state.clone());

        let request = Request::builder()
            .method("POST")
            .uri("/api/score")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"result": "victory"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let unchanged = state.user_service.get_user(&user.id).await.unwrap();
        assert_eq!(unchanged.scores, Default::default());
    }

    #[tokio::test]
    async fn test_leaderboard_handler_empty() {
        let state = AppStateBuilder::new().build().await;
        let app = Router::new()
            .route("/api/leaderboard", get(leaderboard))
            .with_state(state);

        let request = Request::builder()
            .method("GET")
            .uri("/api/leaderboard")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let users: Vec<User> = read_json(response).await;
        assert!(users.is_empty());
    }
}
