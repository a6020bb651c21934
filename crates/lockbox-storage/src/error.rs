//! Storage error types.

/// Errors from the durable store.
///
/// Storage-layer failures are folded into these three kinds at this boundary;
/// callers map them onto the service error taxonomy without ever seeing
/// driver details.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("row already exists")]
    AlreadyExists,

    /// No row matched the owner-scoped predicate.
    #[error("row not found")]
    NotFound,

    /// The backend failed: connectivity, constraint violation other than
    /// uniqueness, or row decoding.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    Self::AlreadyExists
                } else {
                    Self::Backend(format!("database error: {db_err}"))
                }
            }
            _ => Self::Backend(format!("database error: {err}")),
        }
    }
}
