use axum::{
    extract::{Query, State},
    Extension, Json,
};
use tracing::instrument;

use super::types::{
    CreateGameRequest, EmoteRequest, GameStateQuery, JoinGameRequest, LeaveGameRequest,
    MoveRequest, RoomResponse,
};
use crate::session::AuthenticatedUser;
use crate::shared::{ApiJson, AppError, AppState};
use crate::user::types::StatusResponse;

/// HTTP handler for opening a new room
///
/// POST /api/game/create
/// Unsupported board sizes fall back to 3x3
#[instrument(name = "create_game", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn create_game(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<CreateGameRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state
        .room_service
        .create_room(&caller, request.board_size)
        .await?;
    Ok(Json(room))
}

/// HTTP handler for joining a room by its code
///
/// POST /api/game/join
#[instrument(name = "join_game", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn join_game(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<JoinGameRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state.room_service.join_room(&caller, &request.code).await?;
    Ok(Json(room))
}

/// HTTP handler for polling a room
///
/// GET /api/game/state?room_id=...
#[instrument(name = "game_state", skip(state))]
pub async fn game_state(
    State(state): State<AppState>,
    Query(query): Query<GameStateQuery>,
) -> Result<Json<RoomResponse>, AppError> {
    let room_id = query
        .room_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Room ID required".to_string()))?;

    let room = state.room_service.get_state(&room_id).await?;
    Ok(Json(room))
}

/// HTTP handler for placing a mark
///
/// POST /api/game/move
#[instrument(name = "make_move", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn make_move(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<MoveRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state
        .room_service
        .make_move(&caller, &request.room_id, request.index)
        .await?;
    Ok(Json(room))
}

/// HTTP handler for leaving a room
///
/// POST /api/game/leave
/// Succeeds even when the room is already gone
#[instrument(name = "leave_game", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn leave_game(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<LeaveGameRequest>,
) -> Json<StatusResponse> {
    state.room_service.leave_room(&caller, &request.room_id).await;
    Json(StatusResponse::ok())
}

/// HTTP handler for showing an emote to both players
///
/// POST /api/game/emote
#[instrument(name = "emote", skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn emote(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<EmoteRequest>,
) -> Result<Json<RoomResponse>, AppError> {
    let room = state
        .room_service
        .trigger_emote(&caller, &request.room_id, &request.emote_type)
        .await?;
    Ok(Json(room))
}
