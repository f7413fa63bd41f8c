// Public API - what other modules can use
pub use handlers::{get_current_user, leaderboard, update_score};
pub use models::{MatchResult, Scores, User, UserDatabase};
pub use service::UserService;
pub use store::{InMemoryUserStore, JsonFileUserStore, StoreError, UserStore};

// Internal modules
mod handlers;
pub mod models;
pub mod service;
pub mod store;
pub mod types;
