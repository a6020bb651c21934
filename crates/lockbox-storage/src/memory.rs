//! In-memory store for development mode and tests.
//!
//! Same contract as the PostgreSQL store, backed by `BTreeMap`s behind a
//! `RwLock`. Not persistent — all data is lost when the process exits. Each
//! operation takes the lock once, so read-modify-write sequences are atomic
//! with respect to concurrent callers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use lockbox_core::models::{SecretRecord, User};

use crate::{RecordStore, Stored, StoreError, UserStore};

#[derive(Debug)]
struct RecordTable<T> {
    rows: BTreeMap<i32, (String, T)>,
    next_id: i32,
}

/// An in-memory record table for one secret type.
///
/// Ids are assigned from a monotonic counter starting at 1, mirroring the
/// SERIAL columns of the durable schema.
#[derive(Debug, Clone)]
pub struct MemoryRecordStore<T> {
    table: Arc<RwLock<RecordTable<T>>>,
}

impl<T> MemoryRecordStore<T> {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(RecordTable {
                rows: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }
}

impl<T> Default for MemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: SecretRecord> RecordStore<T> for MemoryRecordStore<T> {
    async fn add(&self, owner: &str, record: T) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        table.next_id += 1;
        table.rows.insert(id, (owner.to_owned(), record));
        Ok(())
    }

    async fn get(&self, owner: &str, filter_key: &str) -> Result<Vec<Stored<T>>, StoreError> {
        let table = self.table.read().await;
        // BTreeMap iteration order keeps results sorted by id.
        let records = table
            .rows
            .iter()
            .filter(|(_, (row_owner, record))| {
                row_owner == owner && record.filter_key() == filter_key
            })
            .map(|(id, (_, record))| Stored {
                id: *id,
                record: record.clone(),
            })
            .collect();

        Ok(records)
    }

    async fn update(&self, owner: &str, id: i32, record: T) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some((row_owner, row)) if row_owner == owner => {
                *row = record;
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, owner: &str, id: i32) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let owned = matches!(table.rows.get(&id), Some((row_owner, _)) if row_owner == owner);
        if !owned {
            return Err(StoreError::NotFound);
        }

        table.rows.remove(&id);
        Ok(())
    }
}

/// An in-memory user table.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl MemoryUserStore {
    /// Create a new empty user table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<(), StoreError> {
        // Check and insert under one write lock — no window for a duplicate.
        let mut users = self.users.write().await;
        if users.contains_key(login) {
            return Err(StoreError::AlreadyExists);
        }

        users.insert(
            login.to_owned(),
            User {
                login: login.to_owned(),
                password_hash: password_hash.to_owned(),
                created_at: Utc::now(),
            },
        );

        Ok(())
    }

    async fn fetch_user(&self, login: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(login).cloned())
    }
}
