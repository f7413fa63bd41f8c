use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::models::UserDatabase;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for the user registry.
///
/// The registry is always loaded and saved as a whole document.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Loads the registry; a store that has never been written yields an empty one
    async fn load(&self) -> Result<UserDatabase, StoreError>;

    /// Replaces the stored registry with `database`
    async fn save(&self, database: &UserDatabase) -> Result<(), StoreError>;
}

/// Keeps the registry in a single pretty-printed JSON file
pub struct JsonFileUserStore {
    path: PathBuf,
}

impl JsonFileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl UserStore for JsonFileUserStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<UserDatabase, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No existing user database, starting fresh");
                return Ok(UserDatabase::default());
            }
            Err(e) => return Err(e.into()),
        };

        let database: UserDatabase = serde_json::from_slice(&bytes)?;
        info!(user_count = database.users.len(), "Loaded users from database");
        Ok(database)
    }

    #[instrument(skip(self, database), fields(path = %self.path.display()))]
    async fn save(&self, database: &UserDatabase) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(database)?;

        // Write beside the target and rename so readers never see a partial file
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &bytes).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        debug!(
            user_count = database.users.len(),
            bytes = bytes.len(),
            "User database saved"
        );
        Ok(())
    }
}

/// In-memory implementation of UserStore for development and testing
///
/// Holds the most recently saved snapshot. A store built with `failing()`
/// rejects every save, which lets callers exercise their error paths.
#[derive(Default)]
pub struct InMemoryUserStore {
    snapshot: RwLock<UserDatabase>,
    saves: AtomicUsize,
    fail_saves: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `database`
    pub fn with_database(database: UserDatabase) -> Self {
        Self {
            snapshot: RwLock::new(database),
            ..Self::default()
        }
    }

    /// Creates a store whose saves always fail
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Returns a copy of the last saved registry
    pub async fn snapshot(&self) -> UserDatabase {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn load(&self) -> Result<UserDatabase, StoreError> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, database: &UserDatabase) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Unavailable(
                "in-memory store configured to fail".to_string(),
            ));
        }

        *self.snapshot.write().await = database.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
