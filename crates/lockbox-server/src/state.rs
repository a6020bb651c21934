//! Shared application state.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the user directory, the token codec,
//! and one trait-object store per secret record type. [`ProvideRecords`]
//! lets the generic record handlers reach the store for their type.

use std::sync::Arc;

use lockbox_core::auth::TokenCodec;
use lockbox_core::models::{Binary, Credential, Note, Payment, SecretRecord};
use lockbox_storage::{
    MemoryRecordStore, MemoryUserStore, PgVaultStore, RecordStore, UserStore,
};

use crate::directory::UserDirectory;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Registration and authentication.
    pub directory: UserDirectory,
    /// Token verification for the auth middleware.
    pub tokens: TokenCodec,
    /// Credential record store.
    pub credentials: Arc<dyn RecordStore<Credential>>,
    /// Note record store.
    pub notes: Arc<dyn RecordStore<Note>>,
    /// Binary record store.
    pub binaries: Arc<dyn RecordStore<Binary>>,
    /// Payment record store.
    pub payments: Arc<dyn RecordStore<Payment>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Assemble state from individual stores.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        credentials: Arc<dyn RecordStore<Credential>>,
        notes: Arc<dyn RecordStore<Note>>,
        binaries: Arc<dyn RecordStore<Binary>>,
        payments: Arc<dyn RecordStore<Payment>>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            directory: UserDirectory::new(users, tokens.clone()),
            tokens,
            credentials,
            notes,
            binaries,
            payments,
        }
    }

    /// State over fresh in-memory stores, for development mode and tests.
    #[must_use]
    pub fn in_memory(tokens: TokenCodec) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryRecordStore::<Credential>::new()),
            Arc::new(MemoryRecordStore::<Note>::new()),
            Arc::new(MemoryRecordStore::<Binary>::new()),
            Arc::new(MemoryRecordStore::<Payment>::new()),
            tokens,
        )
    }

    /// State over a shared PostgreSQL store.
    #[must_use]
    pub fn with_postgres(store: Arc<PgVaultStore>, tokens: TokenCodec) -> Self {
        let users: Arc<dyn UserStore> = store.clone();
        let credentials: Arc<dyn RecordStore<Credential>> = store.clone();
        let notes: Arc<dyn RecordStore<Note>> = store.clone();
        let binaries: Arc<dyn RecordStore<Binary>> = store.clone();
        let payments: Arc<dyn RecordStore<Payment>> = store;
        Self::new(users, credentials, notes, binaries, payments, tokens)
    }
}

/// Access to the record store for one secret type.
///
/// Implemented once per record type so a single generic handler set can be
/// instantiated for all four.
pub trait ProvideRecords<T: SecretRecord> {
    /// The store holding `T` rows.
    fn records(&self) -> &dyn RecordStore<T>;
}

impl ProvideRecords<Credential> for AppState {
    fn records(&self) -> &dyn RecordStore<Credential> {
        self.credentials.as_ref()
    }
}

impl ProvideRecords<Note> for AppState {
    fn records(&self) -> &dyn RecordStore<Note> {
        self.notes.as_ref()
    }
}

impl ProvideRecords<Binary> for AppState {
    fn records(&self) -> &dyn RecordStore<Binary> {
        self.binaries.as_ref()
    }
}

impl ProvideRecords<Payment> for AppState {
    fn records(&self) -> &dyn RecordStore<Payment> {
        self.payments.as_ref()
    }
}
