//! Request authentication.
//!
//! The bearer middleware verifies the identity token from the
//! `Authorization` header and injects a typed [`Identity`] into request
//! extensions. Handlers take `Extension<Identity>` — identity is never read
//! from a request payload, and a missing extension is a middleware-ordering
//! bug that surfaces as a 500, not a client fault.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::error::VaultError;
use crate::state::AppState;

/// Identity of the authenticated caller, as asserted by a verified token.
#[derive(Debug, Clone)]
pub struct Identity {
    /// The verified login. Sole source of `owner` for every record operation.
    pub login: String,
}

/// Axum middleware that authenticates vault API requests.
///
/// Injects [`Identity`] into request extensions on success.
///
/// # Errors
///
/// Returns [`VaultError::Unauthenticated`] if the `Authorization` header is
/// missing, malformed, or carries a token that fails verification.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, VaultError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let Some(header) = auth_header else {
        return Err(VaultError::Unauthenticated(
            "missing Authorization header".to_owned(),
        ));
    };

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        VaultError::Unauthenticated("Authorization header must use Bearer scheme".to_owned())
    })?;

    let login = state
        .tokens
        .verify(token)
        .map_err(|_| VaultError::Unauthenticated("invalid or expired token".to_owned()))?;

    req.extensions_mut().insert(Identity { login });

    Ok(next.run(req).await)
}
