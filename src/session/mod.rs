// Public API - what other modules can use
pub use handlers::{login, logout, register};
pub use middleware::require_auth;
pub use service::SessionService;
pub use types::{bearer_token, AuthenticatedUser};

// Internal modules
mod handlers;
mod middleware;
pub mod models;
pub mod repository;
pub mod service;
mod token;
mod types;
