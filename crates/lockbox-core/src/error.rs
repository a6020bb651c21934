//! Error types for `lockbox-core`.

/// Errors from issuing or verifying identity tokens.
///
/// Messages never include the signing key or the token payload.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signing the claims failed.
    #[error("token signing failed: {0}")]
    Sign(String),

    /// The token was rejected: wrong algorithm, bad signature, expired,
    /// or undecodable claims.
    #[error("token rejected: {0}")]
    Verify(String),
}
