//! Full-stack REST API integration tests.
//!
//! Each test builds the real router over fresh in-memory stores and sends
//! actual HTTP requests via `tower::ServiceExt`. This validates routing,
//! serialization, the auth middleware, handler logic, and the store contract
//! in one pass.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // for `.oneshot()`

use lockbox_core::auth::TokenCodec;
use lockbox_server::routes;
use lockbox_server::state::AppState;

const TEST_TOKEN_KEY: &str = "integration-test-secret";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app() -> Router {
    let state = Arc::new(AppState::in_memory(TokenCodec::new(TEST_TOKEN_KEY)));
    routes::router(state)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(val) => builder.body(Body::from(val.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> axum::response::Response {
    router.clone().oneshot(req).await.unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
}

/// Register a user and return their token.
async fn register(router: &Router, login: &str, password: &str) -> String {
    let resp = send(
        router,
        json_request(
            Method::POST,
            "/v1/users/register",
            None,
            Some(json!({ "login": login, "password": password })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    body["token"].as_str().expect("token in response").to_owned()
}

async fn add_credential(router: &Router, token: &str, website: &str, login: &str, password: &str) {
    let resp = send(
        router,
        json_request(
            Method::POST,
            "/v1/vault/credentials",
            Some(token),
            Some(json!({ "website": website, "login": login, "password": password })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn get_credentials(router: &Router, token: &str, website: &str) -> Value {
    let resp = send(
        router,
        json_request(
            Method::GET,
            &format!("/v1/vault/credentials/{website}"),
            Some(token),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// ---------------------------------------------------------------------------
// Registration & login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_verifiable_token() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let codec = TokenCodec::new(TEST_TOKEN_KEY);
    assert_eq!(codec.verify(&token).unwrap(), "alice");
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let router = app();
    register(&router, "alice", "hunter2").await;

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/users/register",
            None,
            Some(json!({ "login": "alice", "password": "other" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "already_exists");

    // The rejected attempt left no trace: the original password still works,
    // the rejected one does not.
    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/users/login",
            None,
            Some(json!({ "login": "alice", "password": "hunter2" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/users/login",
            None,
            Some(json!({ "login": "alice", "password": "other" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_login_is_bad_request() {
    let router = app();
    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/users/register",
            None,
            Some(json!({ "login": "", "password": "hunter2" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_unknown_user_is_not_found() {
    let router = app();
    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/users/login",
            None,
            Some(json!({ "login": "ghost", "password": "whatever" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_wrong_password_is_bad_request() {
    let router = app();
    register(&router, "alice", "hunter2").await;

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/users/login",
            None,
            Some(json!({ "login": "alice", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "invalid login or password");
}

// ---------------------------------------------------------------------------
// Authentication on the vault surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vault_routes_require_a_token() {
    let router = app();
    let resp = send(
        &router,
        json_request(Method::GET, "/v1/vault/credentials/example.com", None, None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_authorization_header_is_unauthorized() {
    let router = app();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/v1/vault/credentials/example.com")
        .header("authorization", "Token abc123")
        .body(Body::empty())
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let resp = send(
        &router,
        json_request(
            Method::GET,
            "/v1/vault/credentials/example.com",
            Some(&tampered),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "unauthenticated");
}

// ---------------------------------------------------------------------------
// Credential CRUD & tenant isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_then_get_returns_stored_fields_and_generated_id() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;
    add_credential(&router, &token, "example.com", "alice@example.com", "s3cret").await;

    let body = get_credentials(&router, &token, "example.com").await;
    assert_eq!(
        body["records"],
        json!([{ "website": "example.com", "login": "alice@example.com", "password": "s3cret" }])
    );
    assert_eq!(body["ids"].as_array().unwrap().len(), 1);
    assert!(body["ids"][0].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn get_does_not_cross_tenants() {
    let router = app();
    let alice = register(&router, "alice", "hunter2").await;
    let bob = register(&router, "bob", "qwerty").await;
    add_credential(&router, &alice, "example.com", "alice@example.com", "s3cret").await;

    let body = get_credentials(&router, &bob, "example.com").await;
    assert_eq!(body["records"], json!([]));
    assert_eq!(body["ids"], json!([]));
}

#[tokio::test]
async fn get_requires_exact_filter_match() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;
    add_credential(&router, &token, "example.com", "alice@example.com", "s3cret").await;

    let body = get_credentials(&router, &token, "example").await;
    assert_eq!(body["records"], json!([]));
}

#[tokio::test]
async fn update_then_get_returns_new_fields() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;
    add_credential(&router, &token, "example.com", "alice@example.com", "old").await;
    let id = get_credentials(&router, &token, "example.com").await["ids"][0]
        .as_i64()
        .unwrap();

    let resp = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/v1/vault/credentials/{id}"),
            Some(&token),
            Some(json!({ "website": "example.org", "login": "alice@example.org", "password": "new" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Old filter key no longer matches; new one carries the new fields.
    assert_eq!(
        get_credentials(&router, &token, "example.com").await["records"],
        json!([])
    );
    let body = get_credentials(&router, &token, "example.org").await;
    assert_eq!(
        body["records"],
        json!([{ "website": "example.org", "login": "alice@example.org", "password": "new" }])
    );
    assert_eq!(body["ids"][0].as_i64().unwrap(), id);
}

#[tokio::test]
async fn delete_then_get_is_empty() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;
    add_credential(&router, &token, "example.com", "alice@example.com", "s3cret").await;
    let id = get_credentials(&router, &token, "example.com").await["ids"][0]
        .as_i64()
        .unwrap();

    let resp = send(
        &router,
        json_request(
            Method::DELETE,
            &format!("/v1/vault/credentials/{id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body = get_credentials(&router, &token, "example.com").await;
    assert_eq!(body["records"], json!([]));
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let resp = send(
        &router,
        json_request(
            Method::PUT,
            "/v1/vault/credentials/999",
            Some(&token),
            Some(json!({ "website": "x.com", "login": "x", "password": "x" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_unknown_id_is_not_found() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let resp = send(
        &router,
        json_request(Method::DELETE, "/v1/vault/credentials/999", Some(&token), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cross_owner_update_does_not_alter_the_record() {
    let router = app();
    let alice = register(&router, "alice", "hunter2").await;
    let mallory = register(&router, "mallory", "evil").await;
    add_credential(&router, &alice, "example.com", "alice@example.com", "s3cret").await;
    let id = get_credentials(&router, &alice, "example.com").await["ids"][0]
        .as_i64()
        .unwrap();

    let resp = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/v1/vault/credentials/{id}"),
            Some(&mallory),
            Some(json!({ "website": "example.com", "login": "mallory", "password": "stolen" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = get_credentials(&router, &alice, "example.com").await;
    assert_eq!(
        body["records"],
        json!([{ "website": "example.com", "login": "alice@example.com", "password": "s3cret" }])
    );
}

#[tokio::test]
async fn cross_owner_delete_does_not_remove_the_record() {
    let router = app();
    let alice = register(&router, "alice", "hunter2").await;
    let mallory = register(&router, "mallory", "evil").await;
    add_credential(&router, &alice, "example.com", "alice@example.com", "s3cret").await;
    let id = get_credentials(&router, &alice, "example.com").await["ids"][0]
        .as_i64()
        .unwrap();

    let resp = send(
        &router,
        json_request(
            Method::DELETE,
            &format!("/v1/vault/credentials/{id}"),
            Some(&mallory),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        get_credentials(&router, &alice, "example.com").await["records"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

// ---------------------------------------------------------------------------
// The other record types
// ---------------------------------------------------------------------------

#[tokio::test]
async fn note_round_trip() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/vault/notes",
            Some(&token),
            Some(json!({ "title": "recovery codes", "body": "1234 5678" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
        &router,
        json_request(
            Method::GET,
            "/v1/vault/notes/recovery%20codes",
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(
        body["records"],
        json!([{ "title": "recovery codes", "body": "1234 5678" }])
    );
}

#[tokio::test]
async fn binary_round_trip_preserves_payload() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    // "3q2+7w==" is base64 for de ad be ef.
    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/vault/binaries",
            Some(&token),
            Some(json!({ "title": "backup", "payload": "3q2+7w==" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
        &router,
        json_request(Method::GET, "/v1/vault/binaries/backup", Some(&token), None),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["records"][0]["payload"], "3q2+7w==");
}

#[tokio::test]
async fn binary_with_invalid_base64_is_rejected() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let resp = send(
        &router,
        json_request(
            Method::POST,
            "/v1/vault/binaries",
            Some(&token),
            Some(json!({ "title": "backup", "payload": "not base64!!" })),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn payment_round_trip_and_delete() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;

    let card = json!({
        "card_name": "travel",
        "cardholder": "ALICE SMITH",
        "number": "4111111111111111",
        "expiry": "12/28",
        "security_code": "123"
    });
    let resp = send(
        &router,
        json_request(Method::POST, "/v1/vault/payments", Some(&token), Some(card.clone())),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
        &router,
        json_request(Method::GET, "/v1/vault/payments/travel", Some(&token), None),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["records"], json!([card]));
    let id = body["ids"][0].as_i64().unwrap();

    let resp = send(
        &router,
        json_request(
            Method::DELETE,
            &format!("/v1/vault/payments/{id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(
        &router,
        json_request(Method::GET, "/v1/vault/payments/travel", Some(&token), None),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["records"], json!([]));
}

#[tokio::test]
async fn multiple_records_share_a_filter_key_in_id_order() {
    let router = app();
    let token = register(&router, "alice", "hunter2").await;
    add_credential(&router, &token, "example.com", "first", "one").await;
    add_credential(&router, &token, "example.com", "second", "two").await;

    let body = get_credentials(&router, &token, "example.com").await;
    let ids = body["ids"].as_array().unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids[0].as_i64().unwrap() < ids[1].as_i64().unwrap());
    assert_eq!(body["records"][0]["login"], "first");
    assert_eq!(body["records"][1]["login"], "second");
}
