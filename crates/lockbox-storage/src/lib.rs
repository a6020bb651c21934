//! Durable store abstraction for Lockbox.
//!
//! This crate defines the owner-scoped storage contract — [`RecordStore`] for
//! the four secret record tables and [`UserStore`] for the account table —
//! and two implementations of it:
//!
//! - [`PgVaultStore`] — production default, backed by PostgreSQL via sqlx
//! - [`MemoryRecordStore`] / [`MemoryUserStore`] — in-memory, for development
//!   mode and tests
//!
//! Every record operation takes the owner login alongside any id or filter
//! key. Implementations must include the owner in every lookup and mutation
//! predicate; an id alone never selects a row.

mod error;
mod memory;
mod postgres;

pub use error::StoreError;
pub use memory::{MemoryRecordStore, MemoryUserStore};
pub use postgres::PgVaultStore;

use lockbox_core::models::{SecretRecord, User};

/// A secret record together with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stored<T> {
    pub id: i32,
    pub record: T,
}

/// Owner-scoped CRUD over one secret record table.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait RecordStore<T: SecretRecord>: Send + Sync + 'static {
    /// Insert a new row for `owner`. The id and creation timestamp are
    /// assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the store rejects the write.
    async fn add(&self, owner: &str, record: T) -> Result<(), StoreError>;

    /// Fetch all of `owner`'s rows whose filter column equals `filter_key`
    /// exactly, ordered by id. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the query or row decoding fails.
    async fn get(&self, owner: &str, filter_key: &str) -> Result<Vec<Stored<T>>, StoreError>;

    /// Overwrite the payload of the row identified by `(owner, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matched, so a caller can
    /// never mutate another owner's row by guessing ids.
    async fn update(&self, owner: &str, id: i32, record: T) -> Result<(), StoreError>;

    /// Remove the row identified by `(owner, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no row matched.
    async fn delete(&self, owner: &str, id: i32) -> Result<(), StoreError>;
}

/// The user account table.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Insert a new user in a single conditional statement.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] if the login is taken — the
    /// existing row is left untouched.
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<(), StoreError>;

    /// Look up a user by login. Returns `Ok(None)` if unregistered.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the lookup fails.
    async fn fetch_user(&self, login: &str) -> Result<Option<User>, StoreError>;
}
