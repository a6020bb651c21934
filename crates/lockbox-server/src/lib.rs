//! Lockbox HTTP server.
//!
//! Wires the domain types, token codec, and durable stores into a running
//! Axum server: unauthenticated register/login endpoints and the
//! bearer-token-gated secret record API at `/v1/vault/*`.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod routes;
pub mod state;
