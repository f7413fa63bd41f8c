use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{is_valid_username, MatchResult, User, UserDatabase, MAX_USERNAME_LEN, MIN_USERNAME_LEN},
    store::{StoreError, UserStore},
};
use crate::shared::AppError;

/// Number of entries returned by the leaderboard
pub const LEADERBOARD_SIZE: usize = 10;

/// Owner of every `User` record.
///
/// Other components refer to users by id and come back here for reads and
/// score changes. Every mutation rewrites the durable store in full; a failed
/// write is logged and the in-memory registry stays authoritative.
pub struct UserService {
    users: RwLock<UserDatabase>,
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Loads the registry from `store` and wraps it in a service
    #[instrument(skip(store))]
    pub async fn load(store: Arc<dyn UserStore>) -> Result<Self, StoreError> {
        let database = store.load().await?;
        info!(user_count = database.users.len(), "User registry ready");

        Ok(Self {
            users: RwLock::new(database),
            store,
        })
    }

    /// Registers a new user under a unique display name
    #[instrument(skip(self))]
    pub async fn register(&self, username: &str) -> Result<User, AppError> {
        if !is_valid_username(username) {
            return Err(AppError::BadRequest(format!(
                "Username must be {}-{} characters",
                MIN_USERNAME_LEN, MAX_USERNAME_LEN
            )));
        }

        // Uniqueness check and insert share one write guard
        let mut users = self.users.write().await;
        if users.find_by_username(username).is_some() {
            debug!(username = %username, "Username already taken");
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let user = User::new(username.to_string());
        users.users.insert(user.id.clone(), user.clone());
        self.persist(&users).await;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Looks up a user by exact display name
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.find_by_username(username).cloned()
    }

    /// Looks up a user by id
    pub async fn get_user(&self, user_id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.users.get(user_id).cloned()
    }

    /// Records a single manually reported result for one user
    #[instrument(skip(self))]
    pub async fn record_result(&self, user_id: &str, result: MatchResult) -> Result<User, AppError> {
        self.apply_results(&[(user_id.to_string(), result)]).await;

        self.get_user(user_id)
            .await
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Applies a batch of score changes and persists once.
    ///
    /// Ids that no longer resolve are skipped. Callers that hold the room
    /// registry lock may call this; the user lock is always taken second.
    #[instrument(skip(self))]
    pub async fn apply_results(&self, results: &[(String, MatchResult)]) {
        if results.is_empty() {
            return;
        }

        let mut users = self.users.write().await;
        for (user_id, result) in results {
            match users.users.get_mut(user_id) {
                Some(user) => {
                    user.record(*result);
                    debug!(
                        user_id = %user_id,
                        result = %result,
                        wins = user.scores.wins,
                        losses = user.scores.losses,
                        draws = user.scores.draws,
                        "Score updated"
                    );
                }
                None => warn!(user_id = %user_id, "Score update for unknown user skipped"),
            }
        }
        self.persist(&users).await;
    }

    /// Top players ordered by wins, most first.
    ///
    /// Ties keep registration order so repeated reads agree.
    #[instrument(skip(self))]
    pub async fn leaderboard(&self) -> Vec<User> {
        let mut ranked: Vec<User> = {
            let users = self.users.read().await;
            users.users.values().cloned().collect()
        };

        ranked.sort_by_key(|user| (Reverse(user.scores.wins), user.created_at, user.id.clone()));
        ranked.truncate(LEADERBOARD_SIZE);
        ranked
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.users.len()
    }

    async fn persist(&self, users: &UserDatabase) {
        if let Err(e) = self.store.save(users).await {
            warn!(error = %e, "Failed to persist user database; keeping in-memory state");
        }
    }
}
