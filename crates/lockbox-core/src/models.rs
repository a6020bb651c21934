//! Domain models.
//!
//! One struct per secret record type (credential, note, binary, payment)
//! plus the [`User`] account row. Record structs carry only the caller-supplied
//! payload fields — `id`, `owner`, and `created_at` are assigned by the store
//! and never travel in a request body.
//!
//! The [`SecretRecord`] trait is the record-type descriptor that lets a single
//! generic repository serve all four tables: table name, filter column, payload
//! column list, and the bind order for parameterized statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parameterized query against the durable store.
pub type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Descriptor for a secret record type.
///
/// Implementations declare where their rows live (`TABLE`), which secondary
/// column narrows a lookup (`FILTER_COLUMN`), and the payload columns in bind
/// order (`COLUMNS`). [`bind_to`](SecretRecord::bind_to) must push the field
/// values in exactly `COLUMNS` order.
pub trait SecretRecord:
    Clone
    + Send
    + Sync
    + Unpin
    + Serialize
    + serde::de::DeserializeOwned
    + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
    + 'static
{
    /// Backing table name.
    const TABLE: &'static str;
    /// Column matched exactly by `get` lookups.
    const FILTER_COLUMN: &'static str;
    /// Payload columns in bind order.
    const COLUMNS: &'static [&'static str];

    /// The value of this record's filter column.
    fn filter_key(&self) -> &str;

    /// Bind the payload fields onto `query` in `COLUMNS` order.
    fn bind_to<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

/// A registered user account.
///
/// `login` is the primary identity; every secret row references it as its
/// owner. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub login: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A website login/password triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    pub website: String,
    pub login: String,
    pub password: String,
}

impl SecretRecord for Credential {
    const TABLE: &'static str = "credentials";
    const FILTER_COLUMN: &'static str = "website";
    const COLUMNS: &'static [&'static str] = &["website", "login", "password"];

    fn filter_key(&self) -> &str {
        &self.website
    }

    fn bind_to<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.website)
            .bind(&self.login)
            .bind(&self.password)
    }
}

/// A free-form text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    pub title: String,
    pub body: String,
}

impl SecretRecord for Note {
    const TABLE: &'static str = "notes";
    const FILTER_COLUMN: &'static str = "title";
    const COLUMNS: &'static [&'static str] = &["title", "body"];

    fn filter_key(&self) -> &str {
        &self.title
    }

    fn bind_to<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.title).bind(&self.body)
    }
}

/// An opaque binary blob. The payload travels base64-encoded in JSON and is
/// stored as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Binary {
    pub title: String,
    #[serde(with = "base64_bytes")]
    pub payload: Vec<u8>,
}

impl SecretRecord for Binary {
    const TABLE: &'static str = "binaries";
    const FILTER_COLUMN: &'static str = "title";
    const COLUMNS: &'static [&'static str] = &["title", "payload"];

    fn filter_key(&self) -> &str {
        &self.title
    }

    fn bind_to<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.title).bind(self.payload.as_slice())
    }
}

/// A payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub card_name: String,
    pub cardholder: String,
    pub number: String,
    pub expiry: String,
    pub security_code: String,
}

impl SecretRecord for Payment {
    const TABLE: &'static str = "payments";
    const FILTER_COLUMN: &'static str = "card_name";
    const COLUMNS: &'static [&'static str] = &[
        "card_name",
        "cardholder",
        "number",
        "expiry",
        "security_code",
    ];

    fn filter_key(&self) -> &str {
        &self.card_name
    }

    fn bind_to<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.card_name)
            .bind(&self.cardholder)
            .bind(&self.number)
            .bind(&self.expiry)
            .bind(&self.security_code)
    }
}

/// Serde helpers for byte payloads as standard base64 strings.
mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
