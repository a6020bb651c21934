//! Server configuration.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `LOCKBOX_*` environment variables.

use std::net::SocketAddr;

/// Built-in development signing key, used when `LOCKBOX_TOKEN_KEY` is unset.
/// Production deployments must supply their own key.
pub const DEV_TOKEN_KEY: &str = "lockbox-dev-signing-key";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Symmetric key for signing identity tokens.
    pub token_key: String,
}

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// PostgreSQL persistent storage.
    Postgres { url: String },
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `LOCKBOX_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8600`)
    /// - `LOCKBOX_STORAGE` — `memory` or `postgres` (default: `memory`)
    /// - `DATABASE_URL` — PostgreSQL connection string (required when `LOCKBOX_STORAGE=postgres`)
    /// - `LOCKBOX_LOG_LEVEL` — log filter (default: `info`)
    /// - `LOCKBOX_TOKEN_KEY` — token signing key (default: built-in dev key)
    #[must_use]
    pub fn from_env() -> Self {
        // Priority: LOCKBOX_BIND_ADDR > PORT > default 127.0.0.1:8600
        let bind_addr = if let Ok(addr) = std::env::var("LOCKBOX_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8600)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8600);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8600))
        };

        let storage_backend = match std::env::var("LOCKBOX_STORAGE")
            .unwrap_or_else(|_| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => {
                let url = std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/lockbox".to_owned());
                StorageBackendType::Postgres { url }
            }
            _ => StorageBackendType::Memory,
        };

        let log_level = std::env::var("LOCKBOX_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let token_key =
            std::env::var("LOCKBOX_TOKEN_KEY").unwrap_or_else(|_| DEV_TOKEN_KEY.to_owned());

        Self {
            bind_addr,
            storage_backend,
            log_level,
            token_key,
        }
    }
}
