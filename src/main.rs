//! Bookshelf web application.
//!
//! # Environment Variables
//!
//! - `DB_TYPE`: `sqlite` (default) | `postgresql` | `mysql` | `memory`
//! - `DATABASE_URL`: connection string (per-backend default when unset)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `bookshelf=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::api::{AppState, HtmlPresenter, create_router};
use bookshelf::infrastructure::{StoreConfig, StoreFactory};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting bookshelf");

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!(
        backend = ?config.backend,
        max_connections = config.max_connections,
        "Store configuration loaded"
    );

    let store = match StoreFactory::new(config).create().await {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("Failed to initialize store: {}", error);
            std::process::exit(1);
        }
    };

    let application = create_router(AppState::new(store, Arc::new(HtmlPresenter::new())));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let address: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%host, %port, "Invalid listen address: {}", error);
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%address, "Failed to bind: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", address);

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", error);
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on Ctrl+C, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
