//! HTTP routes.

pub mod records;
pub mod users;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware as axum_mw;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use lockbox_core::models::{Binary, Credential, Note, Payment};

use crate::auth;
use crate::state::AppState;

/// Build the full application router.
///
/// Register/login stay open (behind a concurrency limit, since password
/// hashing is CPU work an unauthenticated caller can trigger); everything
/// under `/v1/vault` goes through the bearer-token middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .nest("/v1/users", users::router())
        .layer(tower::limit::ConcurrencyLimitLayer::new(32));

    let vault_routes = Router::new()
        .nest("/v1/vault/credentials", records::router::<Credential>())
        .nest("/v1/vault/notes", records::router::<Note>())
        .nest("/v1/vault/binaries", records::router::<Binary>())
        .nest("/v1/vault/payments", records::router::<Payment>())
        .route_layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ));

    Router::new()
        .merge(user_routes)
        .merge(vault_routes)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}
