use serde::{Deserialize, Serialize};

use super::models::User;

/// Request payload for registering or logging in
#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    #[serde(default)]
    pub username: String,
}

/// Response for register and login: the account plus a fresh session token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

/// Request payload for manually reporting a game result.
/// Kept as free text so an unknown tag is a 400 rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct ScoreUpdateRequest {
    #[serde(default)]
    pub result: String,
}

/// Acknowledgement body for operations without a richer result
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
