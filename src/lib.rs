// Library crate for the Tic-Tac-Toe game server
// This file exposes the public API for the binary and integration tests

pub mod config;
pub mod game;
pub mod room;
pub mod router;
pub mod session;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use game::Mark;
pub use room::{RoomConfig, RoomResponse, RoomStatus};
pub use router::build_router;
pub use shared::{AppError, AppState};
pub use user::{InMemoryUserStore, JsonFileUserStore, User, UserStore};
