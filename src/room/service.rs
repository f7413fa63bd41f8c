use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{
    code::normalize_code,
    models::{GameOutcome, GameRoom, RoomStatus},
    repository::RoomRegistry,
    types::RoomResponse,
};
use crate::game::board::Mark;
use crate::session::AuthenticatedUser;
use crate::shared::AppError;
use crate::user::UserService;

/// Tunables for room behaviour
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// How long an emote stays visible before a state read clears it
    pub emote_display: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            emote_display: Duration::from_secs(3),
        }
    }
}

/// Drives every room through waiting, playing and finished.
///
/// Each operation holds the registry write guard for its whole
/// read-modify-write, including any score update it triggers.
pub struct RoomService {
    rooms: RoomRegistry,
    users: Arc<UserService>,
    config: RoomConfig,
}

impl RoomService {
    pub fn new(users: Arc<UserService>, config: RoomConfig) -> Self {
        Self {
            rooms: RoomRegistry::new(),
            users,
            config,
        }
    }

    /// Opens a new room with the caller seated as X
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn create_room(
        &self,
        caller: &AuthenticatedUser,
        board_size: i64,
    ) -> Result<RoomResponse, AppError> {
        let mut rooms = self.rooms.write().await;

        let code = rooms.allocate_code()?;
        let room = GameRoom::new(code, board_size, caller.user_id.clone());
        let response = self.snapshot(&room).await;
        info!(
            room_id = %room.id,
            code = %room.code,
            board_size = room.board_size,
            "Room created"
        );
        rooms.insert(room);

        Ok(response)
    }

    /// Seats the caller as O in the room behind `code`.
    /// Re-joining a room the caller already sits in returns it unchanged.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn join_room(
        &self,
        caller: &AuthenticatedUser,
        code: &str,
    ) -> Result<RoomResponse, AppError> {
        let code = normalize_code(code);
        let mut rooms = self.rooms.write().await;

        let room_id = rooms
            .room_id_for_code(&code)
            .map(str::to_string)
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;
        let room = rooms
            .get_mut(&room_id)
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        if room.seat_of(&caller.user_id).is_some() {
            debug!(room_id = %room.id, "Caller already seated, returning current state");
            return Ok(self.snapshot(room).await);
        }

        if room.is_full() {
            return Err(AppError::Conflict("Game is full".to_string()));
        }

        room.seat_second_player(caller.user_id.clone());
        info!(room_id = %room.id, username = %caller.username, "Player joined, game started");

        Ok(self.snapshot(room).await)
    }

    /// Places the caller's mark and settles scores if the game ends
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn make_move(
        &self,
        caller: &AuthenticatedUser,
        room_id: &str,
        index: i64,
    ) -> Result<RoomResponse, AppError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        let outcome = room.apply_move(&caller.user_id, index)?;
        debug!(room_id = %room_id, index = index, "Move applied");

        if let Some(outcome) = outcome {
            self.settle(room, outcome).await;
        }

        Ok(self.snapshot(room).await)
    }

    /// Leaves a room.
    ///
    /// A waiting or finished room is deleted. In a running game the leaver
    /// forfeits. Unknown rooms count as already gone.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn leave_room(&self, caller: &AuthenticatedUser, room_id: &str) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(room_id) else {
            debug!(room_id = %room_id, "Leave for unknown room ignored");
            return;
        };

        let status = room.status;
        match status {
            RoomStatus::Playing => match room.forfeit(&caller.user_id) {
                Some(outcome) => {
                    info!(room_id = %room_id, winner = %outcome.as_str(), "Player forfeited");
                    self.settle(room, outcome).await;
                }
                None => debug!(room_id = %room_id, "Non-player left a running game, ignoring"),
            },
            RoomStatus::Waiting | RoomStatus::Finished => {
                rooms.remove(room_id);
                info!(room_id = %room_id, "Room closed");
            }
        }
    }

    /// Shows an emote to both players
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn trigger_emote(
        &self,
        caller: &AuthenticatedUser,
        room_id: &str,
        kind: &str,
    ) -> Result<RoomResponse, AppError> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        if room.seat_of(&caller.user_id).is_none() {
            return Err(AppError::Forbidden("You are not in this game".to_string()));
        }

        room.set_emote(kind.to_string(), caller.username.clone());
        info!(room_id = %room_id, emote = %kind, username = %caller.username, "Emote triggered");

        Ok(self.snapshot(room).await)
    }

    /// Current room state. Expired emotes are cleared on the way out.
    #[instrument(skip(self))]
    pub async fn get_state(&self, room_id: &str) -> Result<RoomResponse, AppError> {
        let ttl = chrono::Duration::from_std(self.config.emote_display)
            .unwrap_or(chrono::Duration::MAX);

        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(room_id)
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        if room.clear_stale_emote(Utc::now(), ttl) {
            debug!(room_id = %room_id, "Expired emote cleared");
        }

        Ok(self.snapshot(room).await)
    }

    /// Deletes rooms untouched for longer than `max_idle`; returns how many went
    #[instrument(skip(self))]
    pub async fn sweep_idle_rooms(&self, max_idle: Duration) -> usize {
        let max_idle = chrono::Duration::from_std(max_idle).unwrap_or(chrono::Duration::MAX);
        let cutoff = Utc::now()
            .checked_sub_signed(max_idle)
            .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);

        let removed = self.rooms.write().await.remove_idle(cutoff);
        for room_id in &removed {
            info!(room_id = %room_id, "Deleted idle room");
        }
        removed.len()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Applies score changes for a finished game. Called with the room guard held.
    async fn settle(&self, room: &GameRoom, outcome: GameOutcome) {
        let changes = room.score_changes(outcome);
        if changes.len() < 2 {
            warn!(room_id = %room.id, "Finished game is missing a player");
        }

        self.users.apply_results(&changes).await;
        info!(room_id = %room.id, winner = %outcome.as_str(), "Game finished");
    }

    /// Resolves seated ids to user records for the response
    async fn snapshot(&self, room: &GameRoom) -> RoomResponse {
        let player_x = self.users.get_user(&room.player_x).await;
        let player_o = match room.player_for(Mark::O) {
            Some(user_id) => self.users.get_user(user_id).await,
            None => None,
        };

        RoomResponse::from_room(room, player_x, player_o)
    }
}
