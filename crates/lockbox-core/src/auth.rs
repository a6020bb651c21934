//! Password hashing and identity tokens.
//!
//! [`hash_password`] is a deterministic one-way transform over a fixed pepper
//! plus the plaintext. It is fast and carries no per-record salt — kept for
//! parity with the stored data format; an adaptive KDF is the hardening path
//! for production deployments.
//!
//! [`TokenCodec`] issues and verifies HS256 JWTs carrying the login claim.
//! Verification pins the algorithm, so a token signed with anything other
//! than HS256 is rejected regardless of its signature.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::TokenError;

/// Fixed pepper mixed into every password hash.
const PASSWORD_PEPPER: &str = "x7Kd0QpLbV2wTzGm";

/// Token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

/// Hash a plaintext password for storage or comparison.
///
/// Deterministic: the same input always yields the same hex digest, and the
/// digest never equals the input.
#[must_use]
pub fn hash_password(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(PASSWORD_PEPPER.as_bytes());
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Claims embedded in an identity token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    login: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed identity tokens.
///
/// Symmetric HS256 with a process-wide signing key. Tokens are independent
/// per call — nothing is stored, nothing is revocable.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from the symmetric signing key.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issue a token asserting `login`, valid for 24 hours.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Sign`] if signing fails.
    pub fn issue(&self, login: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            login: login.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Sign(e.to_string()))
    }

    /// Verify a token and return the embedded login unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Verify`] if the algorithm is not HS256, the
    /// signature does not check out, the token is expired, or the claims
    /// cannot be decoded.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Verify(e.to_string()))?;

        Ok(data.claims.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn hash_differs_from_input() {
        for input in ["hunter2", "a", "correct horse battery staple"] {
            assert_ne!(hash_password(input), input);
        }
    }

    #[test]
    fn different_passwords_hash_differently() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
    }

    #[test]
    fn token_round_trip_returns_login() {
        let codec = TokenCodec::new("unit-test-secret");
        let token = codec.issue("alice").unwrap();
        assert_eq!(codec.verify(&token).unwrap(), "alice");
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let codec = TokenCodec::new("unit-test-secret");
        let token = codec.issue("alice").unwrap();

        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(codec.verify(&tampered).is_err());
    }

    #[test]
    fn token_from_other_key_is_rejected() {
        let codec = TokenCodec::new("unit-test-secret");
        let other = TokenCodec::new("some-other-secret");
        let token = other.issue("alice").unwrap();
        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn foreign_algorithm_is_rejected() {
        let codec = TokenCodec::new("unit-test-secret");

        // Same key, wrong HMAC family member.
        let claims = Claims {
            login: "alice".to_owned(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let foreign = jsonwebtoken::encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(codec.verify(&foreign).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = TokenCodec::new("unit-test-secret");
        let claims = Claims {
            login: "alice".to_owned(),
            iat: (Utc::now() - Duration::hours(48)).timestamp(),
            exp: (Utc::now() - Duration::hours(24)).timestamp(),
        };
        let stale = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(codec.verify(&stale).is_err());
    }
}
