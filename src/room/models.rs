use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::game::board::{self, Cell, Mark};
use crate::shared::AppError;
use crate::user::MatchResult;

/// Where a room is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Mark),
    Draw,
}

impl GameOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            GameOutcome::Win(mark) => mark.as_str(),
            GameOutcome::Draw => "draw",
        }
    }
}

/// An emote currently shown to both players
#[derive(Debug, Clone, PartialEq)]
pub struct Emote {
    pub kind: String,
    pub triggered_by: String,
    pub triggered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("Game is not in progress")]
    NotInProgress,
    #[error("You are not in this game")]
    NotSeated,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Invalid move position")]
    OutOfRange(i64),
    #[error("Cell already taken")]
    CellTaken(usize),
}

impl From<MoveError> for AppError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::NotSeated => AppError::Forbidden(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

/// One game between two seated players.
///
/// Seats hold user ids; the user registry owns the records behind them.
#[derive(Debug, Clone)]
pub struct GameRoom {
    pub id: String,
    pub code: String,
    pub board_size: usize,
    pub board: Vec<Cell>,
    pub player_x: String,
    pub player_o: Option<String>,
    pub current_turn: Mark,
    pub status: RoomStatus,
    pub winner: Option<GameOutcome>,
    pub winning_line: Vec<usize>,
    pub last_move: Option<usize>,
    pub emote: Option<Emote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameRoom {
    /// Opens a room with `host_id` seated as X. Unsupported sizes fall back to 3.
    pub fn new(code: String, requested_size: i64, host_id: String) -> Self {
        let board_size = board::normalize_size(requested_size);
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().simple().to_string(),
            code,
            board_size,
            board: vec![None; board_size * board_size],
            player_x: host_id,
            player_o: None,
            current_turn: Mark::X,
            status: RoomStatus::Waiting,
            winner: None,
            winning_line: Vec::new(),
            last_move: None,
            emote: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The mark `user_id` plays with, if seated
    pub fn seat_of(&self, user_id: &str) -> Option<Mark> {
        if self.player_x == user_id {
            Some(Mark::X)
        } else if self.player_o.as_deref() == Some(user_id) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The user seated with `mark`
    pub fn player_for(&self, mark: Mark) -> Option<&str> {
        match mark {
            Mark::X => Some(self.player_x.as_str()),
            Mark::O => self.player_o.as_deref(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.player_o.is_some()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Seats `user_id` as O and starts the game.
    /// Callers check `is_full` and `seat_of` first.
    pub fn seat_second_player(&mut self, user_id: String) {
        self.player_o = Some(user_id);
        self.status = RoomStatus::Playing;
        self.touch();
    }

    /// Places the caller's mark at `index`.
    ///
    /// Returns the outcome when the move ends the game. Otherwise the turn
    /// passes to the other player.
    pub fn apply_move(&mut self, user_id: &str, index: i64) -> Result<Option<GameOutcome>, MoveError> {
        if self.status != RoomStatus::Playing {
            return Err(MoveError::NotInProgress);
        }

        let mark = self.seat_of(user_id).ok_or(MoveError::NotSeated)?;
        if mark != self.current_turn {
            return Err(MoveError::NotYourTurn);
        }

        let cell = usize::try_from(index)
            .ok()
            .filter(|idx| *idx < self.board.len())
            .ok_or(MoveError::OutOfRange(index))?;
        if self.board[cell].is_some() {
            return Err(MoveError::CellTaken(cell));
        }

        self.board[cell] = Some(mark);
        self.last_move = Some(cell);
        self.touch();

        if let Some(line) = board::evaluate_winner(&self.board, self.board_size) {
            let outcome = GameOutcome::Win(line.mark);
            self.finish(outcome, line.cells);
            return Ok(Some(outcome));
        }

        if board::is_draw(&self.board) {
            self.finish(GameOutcome::Draw, Vec::new());
            return Ok(Some(GameOutcome::Draw));
        }

        self.current_turn = self.current_turn.opponent();
        Ok(None)
    }

    /// Ends a running game in favour of whoever did not leave.
    /// Does nothing unless the game is in progress and `user_id` is seated.
    pub fn forfeit(&mut self, user_id: &str) -> Option<GameOutcome> {
        if self.status != RoomStatus::Playing {
            return None;
        }

        let leaver = self.seat_of(user_id)?;
        let outcome = GameOutcome::Win(leaver.opponent());
        self.finish(outcome, Vec::new());
        Some(outcome)
    }

    /// Per-player score changes for a terminal outcome
    pub fn score_changes(&self, outcome: GameOutcome) -> Vec<(String, MatchResult)> {
        let seated = [Mark::X, Mark::O]
            .into_iter()
            .filter_map(|mark| self.player_for(mark).map(|id| (mark, id.to_string())));

        seated
            .map(|(mark, id)| {
                let result = match outcome {
                    GameOutcome::Draw => MatchResult::Draw,
                    GameOutcome::Win(winner) if winner == mark => MatchResult::Win,
                    GameOutcome::Win(_) => MatchResult::Loss,
                };
                (id, result)
            })
            .collect()
    }

    pub fn set_emote(&mut self, kind: String, username: String) {
        let now = Utc::now();
        self.emote = Some(Emote {
            kind,
            triggered_by: username,
            triggered_at: now,
        });
        self.updated_at = now;
    }

    /// Drops an emote that has been visible longer than `ttl`.
    /// Returns whether anything was cleared.
    pub fn clear_stale_emote(&mut self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match &self.emote {
            Some(emote) if now - emote.triggered_at > ttl => {
                self.emote = None;
                true
            }
            _ => false,
        }
    }

    /// True when nothing has touched the room since `cutoff`
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at < cutoff
    }

    fn finish(&mut self, outcome: GameOutcome, winning_line: Vec<usize>) {
        self.winner = Some(outcome);
        self.winning_line = winning_line;
        self.status = RoomStatus::Finished;
        self.touch();
    }
}
