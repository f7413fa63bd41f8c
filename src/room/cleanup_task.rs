use std::sync::Arc;
use std::time::Duration;
use tokio::{task::JoinHandle, time::interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::service::RoomService;

/// Configuration for the cleanup task
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run the cleanup task
    pub cleanup_interval: Duration,
    /// How long a room must be untouched before deletion
    pub inactivity_threshold: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(5 * 60),     // 5 minutes
            inactivity_threshold: Duration::from_secs(60 * 60), // 1 hour
        }
    }
}

/// Spawns the background task that periodically removes idle rooms.
/// Runs until `cancel_token` is cancelled.
pub fn spawn_cleanup_task(
    room_service: Arc<RoomService>,
    config: CleanupConfig,
    cancel_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run_cleanup_loop(room_service, config, cancel_token))
}

#[instrument(skip(room_service, cancel_token))]
async fn run_cleanup_loop(
    room_service: Arc<RoomService>,
    config: CleanupConfig,
    cancel_token: CancellationToken,
) {
    info!(
        cleanup_interval_secs = config.cleanup_interval.as_secs(),
        inactivity_threshold_secs = config.inactivity_threshold.as_secs(),
        "Starting room cleanup background task"
    );

    let mut cleanup_interval = interval(config.cleanup_interval);
    // The first tick completes immediately
    cleanup_interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Room cleanup task stopped");
                return;
            }
            _ = cleanup_interval.tick() => {
                let deleted_count = cleanup_inactive_rooms(&room_service, config.inactivity_threshold).await;
                info!(deleted_count = deleted_count, "Room cleanup completed");
            }
        }
    }
}

/// One sweep over the registry
async fn cleanup_inactive_rooms(room_service: &RoomService, inactivity_threshold: Duration) -> usize {
    debug!("Running room cleanup task");
    room_service.sweep_idle_rooms(inactivity_threshold).await
}
