use std::sync::Arc;
use tictactoe::{
    build_router,
    room::spawn_cleanup_task,
    AppConfig, AppState, JsonFileUserStore, UserStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tictactoe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tic-Tac-Toe game server");

    let config = AppConfig::from_env()?;
    info!(users_db_path = %config.users_db_path.display(), "Loading user registry");

    let user_store: Arc<dyn UserStore> = Arc::new(JsonFileUserStore::new(&config.users_db_path));
    let app_state = AppState::build(user_store, config.room.clone()).await?;

    let cancel_token = CancellationToken::new();
    let cleanup_handle = spawn_cleanup_task(
        app_state.room_service.clone(),
        config.cleanup.clone(),
        cancel_token.clone(),
    );

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel_token.cancel();
    if let Err(e) = cleanup_handle.await {
        warn!(error = %e, "Room cleanup task ended abnormally");
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
