//! PostgreSQL store.
//!
//! One connection pool serves the user table and all four record tables.
//! SQL text for the record operations is assembled from each type's
//! [`SecretRecord`] descriptor, so the four repositories share a single
//! implementation. Every statement carries the owner predicate.
//!
//! [`PgVaultStore::connect`] provisions the schema with `CREATE TABLE IF NOT
//! EXISTS`, so construction is idempotent and safe to run repeatedly.

use sqlx::Row as _;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use lockbox_core::models::{SecretRecord, User};

use crate::{RecordStore, Stored, StoreError, UserStore};

/// Schema statements, run in order on connect. Record tables reference the
/// user table so rows can never outlive their owner, and each carries a
/// composite `(owner, filter)` index for the exact-match lookups.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        login TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS credentials (
        id SERIAL PRIMARY KEY,
        website TEXT NOT NULL,
        login TEXT NOT NULL,
        password TEXT NOT NULL,
        owner TEXT NOT NULL REFERENCES users (login),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_credentials_owner_website
        ON credentials (owner, website)",
    "CREATE TABLE IF NOT EXISTS notes (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        owner TEXT NOT NULL REFERENCES users (login),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_notes_owner_title ON notes (owner, title)",
    "CREATE TABLE IF NOT EXISTS binaries (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        payload BYTEA NOT NULL,
        owner TEXT NOT NULL REFERENCES users (login),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_binaries_owner_title ON binaries (owner, title)",
    "CREATE TABLE IF NOT EXISTS payments (
        id SERIAL PRIMARY KEY,
        card_name TEXT NOT NULL,
        cardholder TEXT NOT NULL,
        number TEXT NOT NULL,
        expiry TEXT NOT NULL,
        security_code TEXT NOT NULL,
        owner TEXT NOT NULL REFERENCES users (login),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE INDEX IF NOT EXISTS idx_payments_owner_card_name
        ON payments (owner, card_name)",
];

/// A durable store backed by PostgreSQL.
///
/// Thread-safe via `PgPool`; all operations are fully async.
#[derive(Clone)]
pub struct PgVaultStore {
    pool: PgPool,
}

impl std::fmt::Debug for PgVaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgVaultStore")
            .field("pool", &"[PgPool]")
            .finish_non_exhaustive()
    }
}

impl PgVaultStore {
    /// Connect to PostgreSQL and provision the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the connection or a schema
    /// statement fails.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(format!("connection failed: {e}")))?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| StoreError::Backend(format!("schema provisioning failed: {e}")))?;
        }

        tracing::debug!("schema provisioned");

        Ok(Self { pool })
    }

    /// Return a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn insert_sql<T: SecretRecord>() -> String {
    let columns = T::COLUMNS.join(", ");
    let placeholders = (1..=T::COLUMNS.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let owner_pos = T::COLUMNS.len() + 1;

    format!(
        "INSERT INTO {} ({columns}, owner) VALUES ({placeholders}, ${owner_pos})",
        T::TABLE
    )
}

fn select_sql<T: SecretRecord>() -> String {
    let columns = T::COLUMNS.join(", ");

    format!(
        "SELECT {columns}, id FROM {} WHERE owner = $1 AND {} = $2 ORDER BY id",
        T::TABLE,
        T::FILTER_COLUMN
    )
}

fn update_sql<T: SecretRecord>() -> String {
    let assignments = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let id_pos = T::COLUMNS.len() + 1;
    let owner_pos = T::COLUMNS.len() + 2;

    format!(
        "UPDATE {} SET {assignments} WHERE id = ${id_pos} AND owner = ${owner_pos}",
        T::TABLE
    )
}

fn delete_sql<T: SecretRecord>() -> String {
    format!("DELETE FROM {} WHERE owner = $1 AND id = $2", T::TABLE)
}

#[async_trait::async_trait]
impl<T: SecretRecord> RecordStore<T> for PgVaultStore {
    async fn add(&self, owner: &str, record: T) -> Result<(), StoreError> {
        let sql = insert_sql::<T>();
        record
            .bind_to(sqlx::query(&sql))
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get(&self, owner: &str, filter_key: &str) -> Result<Vec<Stored<T>>, StoreError> {
        let sql = select_sql::<T>();
        let rows = sqlx::query(&sql)
            .bind(owner)
            .bind(filter_key)
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i32 = row.try_get("id")?;
            let record = T::from_row(row)?;
            records.push(Stored { id, record });
        }

        Ok(records)
    }

    async fn update(&self, owner: &str, id: i32, record: T) -> Result<(), StoreError> {
        let sql = update_sql::<T>();
        let result = record
            .bind_to(sqlx::query(&sql))
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, owner: &str, id: i32) -> Result<(), StoreError> {
        let sql = delete_sql::<T>();
        let result = sqlx::query(&sql)
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for PgVaultStore {
    async fn insert_user(&self, login: &str, password_hash: &str) -> Result<(), StoreError> {
        // Single atomic statement: concurrent registrations of the same login
        // cannot interleave a check with an insert.
        let result = sqlx::query(
            "INSERT INTO users (login, password_hash) VALUES ($1, $2)
             ON CONFLICT (login) DO NOTHING",
        )
        .bind(login)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AlreadyExists);
        }

        Ok(())
    }

    async fn fetch_user(&self, login: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT login, password_hash, created_at FROM users WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
