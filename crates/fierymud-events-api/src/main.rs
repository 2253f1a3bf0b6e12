//! FieryMUD event relay entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use fierymud_events_api::build_router;
use fierymud_events_api::error::AppError;
use fierymud_events_api::state::AppState;
use fierymud_events_core::clock::SystemClock;
use fierymud_events_publisher::EventPublisher;
use fierymud_events_redis::RedisTransport;
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

    tracing::info!("Starting FieryMUD event relay");

    // Read configuration from environment.
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3100".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Start the publisher before accepting requests.
    let publisher = Arc::new(EventPublisher::new(RedisTransport::new()));
    publisher.initialize_from_environment()?;

    let app = build_router(AppState::new(Arc::clone(&publisher), Arc::new(SystemClock)));

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Joins the worker thread; keep it off the async executor.
    tokio::task::spawn_blocking(move || publisher.shutdown())
        .await
        .map_err(|e| AppError::Server(std::io::Error::other(e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
