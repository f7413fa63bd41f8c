use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live login: an opaque bearer token bound to one user.
/// Sessions exist only in memory and end on logout or restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionModel {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl SessionModel {
    pub fn new(token: String, user_id: String) -> Self {
        Self {
            token,
            user_id,
            created_at: Utc::now(),
        }
    }
}
