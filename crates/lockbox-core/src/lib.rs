//! Core library for Lockbox — the multi-tenant secret vault.
//!
//! Holds the domain model (users and the four secret record types), the
//! password hasher, and the identity token codec. Everything here is pure:
//! no I/O, no storage access. Durable persistence lives in `lockbox-storage`
//! and the HTTP surface in `lockbox-server`.

pub mod auth;
pub mod error;
pub mod models;

pub use auth::{TokenCodec, hash_password};
pub use error::TokenError;
pub use models::{Binary, Credential, Note, Payment, SecretRecord, User};
