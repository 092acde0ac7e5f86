//! Showreel API server entry point.

use std::sync::Arc;

use showreel_api::config::Config;
use showreel_api::error::AppError;
use showreel_api::state::AppState;
use showreel_core::clock::SystemClock;
use showreel_playback::application::player::{PlayerHandle, spawn_player};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting showreel API server");

    let config = Config::from_env()?;
    let catalog = Arc::new(config.load_catalog()?);
    tracing::info!(
        groups = catalog.group_count(),
        units = catalog.unit_count(),
        "catalog loaded"
    );

    let player = spawn_player(
        Arc::clone(&catalog),
        Arc::new(SystemClock),
        config.player_config(),
    )?;
    let app = showreel_api::app(AppState::new(player.clone(), catalog));

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown(player))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Waits for Ctrl-C, then stops playback so open event streams finish.
async fn shutdown(player: PlayerHandle) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
    if let Err(err) = player.stop().await {
        tracing::error!(error = %err, "failed to stop playback");
    }
}
