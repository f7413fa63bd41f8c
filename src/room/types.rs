use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{GameRoom, RoomStatus};
use crate::game::board::Mark;
use crate::user::User;

#[derive(Debug, Default, Deserialize)]
pub struct CreateGameRequest {
    #[serde(default)]
    pub board_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    #[serde(default)]
    pub room_id: String,
    pub index: i64,
}

#[derive(Debug, Deserialize)]
pub struct LeaveGameRequest {
    #[serde(default)]
    pub room_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EmoteRequest {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub emote_type: String,
}

#[derive(Debug, Deserialize)]
pub struct GameStateQuery {
    pub room_id: Option<String>,
}

/// Full room snapshot as clients see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub code: String,
    pub board_size: usize,
    /// "X", "O" or "" per cell
    pub board: Vec<String>,
    pub player_x: Option<User>,
    pub player_o: Option<User>,
    pub current_turn: Mark,
    pub status: RoomStatus,
    /// "X", "O", "draw" or ""
    pub winner: String,
    pub winning_line: Vec<usize>,
    /// -1 until the first move
    pub last_move: i64,
    pub show_emote: bool,
    pub emote_type: String,
    pub emote_by: String,
    pub emote_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomResponse {
    /// Builds a snapshot with the seated users already resolved by the caller
    pub fn from_room(room: &GameRoom, player_x: Option<User>, player_o: Option<User>) -> Self {
        let board = room
            .board
            .iter()
            .map(|cell| cell.map(|mark| mark.as_str()).unwrap_or_default().to_string())
            .collect();

        Self {
            id: room.id.clone(),
            code: room.code.clone(),
            board_size: room.board_size,
            board,
            player_x,
            player_o,
            current_turn: room.current_turn,
            status: room.status,
            winner: room
                .winner
                .map(|outcome| outcome.as_str().to_string())
                .unwrap_or_default(),
            winning_line: room.winning_line.clone(),
            last_move: room.last_move.map_or(-1, |idx| idx as i64),
            show_emote: room.emote.is_some(),
            emote_type: room
                .emote
                .as_ref()
                .map(|e| e.kind.clone())
                .unwrap_or_default(),
            emote_by: room
                .emote
                .as_ref()
                .map(|e| e.triggered_by.clone())
                .unwrap_or_default(),
            emote_at: room.emote.as_ref().map(|e| e.triggered_at),
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}
