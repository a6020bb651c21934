//! Lockbox server entry point.
//!
//! Bootstraps the configured storage backend and starts the Axum HTTP
//! server with graceful shutdown on SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use lockbox_core::auth::TokenCodec;
use lockbox_storage::PgVaultStore;

use lockbox_server::config::{self, ServerConfig, StorageBackendType};
use lockbox_server::routes;
use lockbox_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Lockbox starting");

    if config.token_key == config::DEV_TOKEN_KEY {
        warn!("LOCKBOX_TOKEN_KEY not set — using the built-in development signing key");
    }

    let state = build_app_state(&config).await?;
    let app = routes::router(state);

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Lockbox server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Lockbox server stopped");
    Ok(())
}

/// Build the shared application state for the configured backend.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let tokens = TokenCodec::new(&config.token_key);

    let state = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (data will not persist)");
            AppState::in_memory(tokens)
        }
        StorageBackendType::Postgres { url } => {
            info!(url = %"[redacted]", "using PostgreSQL storage");
            let store = Arc::new(
                PgVaultStore::connect(url)
                    .await
                    .context("failed to connect to PostgreSQL storage")?,
            );
            AppState::with_postgres(store, tokens)
        }
    };

    Ok(Arc::new(state))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
