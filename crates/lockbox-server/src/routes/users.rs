//! User registration and login routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::state::AppState;

/// Request body for register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub login: String,
    pub password: String,
}

/// Response carrying a fresh identity token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Build the user router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// `POST /v1/users/register` — create an account and return a token.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, VaultError> {
    let token = state.directory.register(&body.login, &body.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// `POST /v1/users/login` — authenticate and return a fresh token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, VaultError> {
    let token = state
        .directory
        .authenticate(&body.login, &body.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}
