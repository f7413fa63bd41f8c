// Public API - what other modules can use
pub use cleanup_task::{spawn_cleanup_task, CleanupConfig};
pub use handlers::{create_game, emote, game_state, join_game, leave_game, make_move};
pub use models::{GameRoom, RoomStatus};
pub use service::{RoomConfig, RoomService};
pub use types::RoomResponse;

// Internal modules
mod cleanup_task;
mod code;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
