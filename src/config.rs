use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::room::{CleanupConfig, RoomConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_USERS_DB_PATH: &str = "users.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process-level settings, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub users_db_path: PathBuf,
    pub cleanup: CleanupConfig,
    pub room: RoomConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            users_db_path: PathBuf::from(DEFAULT_USERS_DB_PATH),
            cleanup: CleanupConfig::default(),
            room: RoomConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads settings from the environment, falling back to defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);
        if bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "BIND_ADDR",
                value: bind_addr,
            });
        }

        let users_db_path = lookup("USERS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.users_db_path);

        let cleanup = CleanupConfig {
            cleanup_interval: secs(
                &lookup,
                "ROOM_CLEANUP_INTERVAL_SECS",
                defaults.cleanup.cleanup_interval,
            )?,
            inactivity_threshold: secs(
                &lookup,
                "ROOM_IDLE_TIMEOUT_SECS",
                defaults.cleanup.inactivity_threshold,
            )?,
        };
        if cleanup.cleanup_interval.is_zero() {
            return Err(ConfigError::Invalid {
                name: "ROOM_CLEANUP_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        let room = RoomConfig {
            emote_display: secs(&lookup, "EMOTE_DISPLAY_SECS", defaults.room.emote_display)?,
        };

        Ok(Self {
            bind_addr,
            users_db_path,
            cleanup,
            room,
        })
    }
}

fn secs<F>(lookup: &F, name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => u64::from_str(value.trim())
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
