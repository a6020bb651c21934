//! Secret record routes.
//!
//! One generic handler set instantiated per record type — sixteen operations
//! from four functions. The owner for every store call is the verified
//! [`Identity`] login; request payloads carry no owner field at all.
//!
//! Routes per type:
//! - `POST   /` — add a record (id and timestamp are store-assigned)
//! - `GET    /{key}` — all records whose filter column equals `key` exactly
//! - `PUT    /{key}` — overwrite the record with id `key`
//! - `DELETE /{key}` — remove the record with id `key`

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;

use lockbox_core::models::SecretRecord;
use lockbox_storage::RecordStore;

use crate::auth::Identity;
use crate::error::VaultError;
use crate::state::{AppState, ProvideRecords};

/// Response for a record lookup: records and their ids as parallel lists.
#[derive(Debug, Serialize)]
pub struct RecordsResponse<T> {
    pub records: Vec<T>,
    pub ids: Vec<i32>,
}

/// Build the router for one record type.
pub fn router<T>() -> Router<Arc<AppState>>
where
    T: SecretRecord,
    AppState: ProvideRecords<T>,
{
    Router::new().route("/", post(add::<T>)).route(
        "/{key}",
        get(find::<T>).put(update::<T>).delete(remove::<T>),
    )
}

async fn add<T>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Json(record): Json<T>,
) -> Result<StatusCode, VaultError>
where
    T: SecretRecord,
    AppState: ProvideRecords<T>,
{
    let store: &dyn RecordStore<T> = state.records();
    store.add(&identity.login, record).await?;

    Ok(StatusCode::CREATED)
}

async fn find<T>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(filter_key): Path<String>,
) -> Result<Json<RecordsResponse<T>>, VaultError>
where
    T: SecretRecord,
    AppState: ProvideRecords<T>,
{
    let store: &dyn RecordStore<T> = state.records();
    let stored = store.get(&identity.login, &filter_key).await?;

    let (records, ids): (Vec<T>, Vec<i32>) = stored
        .into_iter()
        .map(|entry| (entry.record, entry.id))
        .unzip();

    Ok(Json(RecordsResponse { records, ids }))
}

async fn update<T>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
    Json(record): Json<T>,
) -> Result<StatusCode, VaultError>
where
    T: SecretRecord,
    AppState: ProvideRecords<T>,
{
    let store: &dyn RecordStore<T> = state.records();
    store.update(&identity.login, id, record).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn remove<T>(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> Result<StatusCode, VaultError>
where
    T: SecretRecord,
    AppState: ProvideRecords<T>,
{
    let store: &dyn RecordStore<T> = state.records();
    store.delete(&identity.login, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
