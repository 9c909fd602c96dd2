//! Handlers for `/familyMembers` endpoints.
//!
//! | Method   | Path                  | Notes |
//! |----------|-----------------------|-------|
//! | `GET`    | `/familyMembers`      | Every record, store order |
//! | `POST`   | `/familyMembers`      | Body: record fields; any `id` is ignored; 201 |
//! | `GET`    | `/familyMembers/:id`  | 404 if not found |
//! | `PUT`    | `/familyMembers/:id`  | Full replacement; the path id wins |
//! | `DELETE` | `/familyMembers/:id`  | Returns the removed record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use hearth_core::{Record, RecordFields, RecordId, RecordStore};

use crate::error::ApiError;

fn store_error<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

fn not_found(id: &RecordId) -> ApiError {
  ApiError::NotFound(format!("record {id} not found"))
}

// ─── Collection ───────────────────────────────────────────────────────────────

/// `GET /familyMembers`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RecordStore,
{
  let records = store.list_all().await.map_err(store_error)?;
  Ok(Json(records))
}

/// `POST /familyMembers`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<RecordFields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let Json(fields) = body?;
  let record = store.create(fields).await.map_err(store_error)?;
  tracing::info!(id = %record.id, "created family member");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Single record ────────────────────────────────────────────────────────────

/// `GET /familyMembers/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Record>, ApiError>
where
  S: RecordStore,
{
  let id = RecordId::new(id);
  let record = store
    .get(id.clone())
    .await
    .map_err(store_error)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(record))
}

/// `PUT /familyMembers/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  body: Result<Json<RecordFields>, JsonRejection>,
) -> Result<Json<Record>, ApiError>
where
  S: RecordStore,
{
  let Json(fields) = body?;
  let id = RecordId::new(id);
  let record = store
    .update(id.clone(), fields)
    .await
    .map_err(store_error)?
    .ok_or_else(|| not_found(&id))?;
  tracing::info!(id = %record.id, "updated family member");
  Ok(Json(record))
}

/// `DELETE /familyMembers/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Record>, ApiError>
where
  S: RecordStore,
{
  let id = RecordId::new(id);
  let record = store
    .delete(id.clone())
    .await
    .map_err(store_error)?
    .ok_or_else(|| not_found(&id))?;
  tracing::info!(id = %record.id, "deleted family member");
  Ok(Json(record))
}
