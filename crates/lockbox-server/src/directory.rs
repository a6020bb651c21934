//! User directory — registration and authentication.
//!
//! Holds the user store and the token codec. Registration is a single
//! conditional insert, so two concurrent registrations of the same login
//! cannot both succeed and neither can overwrite the other.

use std::sync::Arc;

use lockbox_core::auth::{hash_password, TokenCodec};
use lockbox_storage::{StoreError, UserStore};

use crate::error::VaultError;

/// Registers and authenticates logins, issuing an identity token on success.
#[derive(Clone)]
pub struct UserDirectory {
    users: Arc<dyn UserStore>,
    tokens: TokenCodec,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory").finish_non_exhaustive()
    }
}

impl UserDirectory {
    /// Build a directory over the given user store.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenCodec) -> Self {
        Self { users, tokens }
    }

    /// Register a new login and return a token for it.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidArgument`] if login or password is empty,
    /// [`VaultError::AlreadyExists`] if the login is taken (without mutating
    /// the existing account), or [`VaultError::Internal`] on store failure.
    pub async fn register(&self, login: &str, password: &str) -> Result<String, VaultError> {
        if login.is_empty() || password.is_empty() {
            return Err(VaultError::InvalidArgument(
                "login and password must not be empty".to_owned(),
            ));
        }

        self.users
            .insert_user(login, &hash_password(password))
            .await
            .map_err(|err| match err {
                StoreError::AlreadyExists => VaultError::AlreadyExists(format!(
                    "user with login \"{login}\" already exists"
                )),
                other => other.into(),
            })?;

        Ok(self.tokens.issue(login)?)
    }

    /// Authenticate an existing login and return a fresh token.
    ///
    /// Tokens are independent per call — nothing is stored or revocable.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] if the login is unregistered,
    /// [`VaultError::InvalidArgument`] if the password does not match, or
    /// [`VaultError::Internal`] on store failure.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<String, VaultError> {
        let user = self
            .users
            .fetch_user(login)
            .await?
            .ok_or_else(|| {
                VaultError::NotFound(format!("user with login \"{login}\" doesn't exist"))
            })?;

        if hash_password(password) != user.password_hash {
            return Err(VaultError::InvalidArgument(
                "invalid login or password".to_owned(),
            ));
        }

        Ok(self.tokens.issue(login)?)
    }
}
