//! In-process tests for the collection router.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use hearth_core::{MemoryStore, Record, RecordFields, RecordStore};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{api_router, mounted_router};

async fn seeded() -> MemoryStore {
  let store = MemoryStore::new();
  for (first, relationship) in [("Ada", "Aunt"), ("Byron", "Uncle")] {
    store
      .create(RecordFields {
        first_name:   first.into(),
        last_name:    "King".into(),
        age:          "40".into(),
        relationship: relationship.into(),
      })
      .await
      .unwrap();
  }
  store
}

async fn oneshot(
  store: MemoryStore,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(Arc::new(store))
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

// ── Collection ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_all_records() {
  let (status, body) = oneshot(seeded().await, "GET", "/familyMembers", None).await;
  assert_eq!(status, StatusCode::OK);
  let records: Vec<Record> = serde_json::from_value(body).unwrap();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0].first_name, "Ada");
  assert_eq!(records[1].id.as_str(), "2");
}

#[tokio::test]
async fn create_assigns_id_and_ignores_client_id() {
  let store = seeded().await;
  let (status, body) = oneshot(
    store.clone(),
    "POST",
    "/familyMembers",
    Some(json!({
      "firstName": "Charles",
      "lastName": "Babbage",
      "age": 79,
      "relationship": "Godfather",
      "id": "0",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["id"], "3");
  assert_eq!(body["age"], "79");
  assert_eq!(store.snapshot().len(), 3);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
  let store = seeded().await;
  let (status, body) = oneshot(
    store.clone(),
    "POST",
    "/familyMembers",
    Some(json!(42)),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
  assert_eq!(store.snapshot().len(), 2);
}

// ── Single record ───────────────────────────────────────────────────────────

#[tokio::test]
async fn get_one_and_missing() {
  let store = seeded().await;
  let (status, body) = oneshot(store.clone(), "GET", "/familyMembers/2", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["firstName"], "Byron");

  let (status, body) = oneshot(store, "GET", "/familyMembers/77", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "record 77 not found");
}

#[tokio::test]
async fn put_replaces_record_and_keeps_path_id() {
  let store = seeded().await;
  let (status, body) = oneshot(
    store.clone(),
    "PUT",
    "/familyMembers/1",
    Some(json!({
      "firstName": "Ada",
      "lastName": "Lovelace",
      "age": "36",
      "relationship": "Aunt",
      "id": "999",
    })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["id"], "1");
  assert_eq!(body["lastName"], "Lovelace");
  assert_eq!(store.snapshot()[0].last_name, "Lovelace");
}

#[tokio::test]
async fn put_missing_is_not_found() {
  let (status, _) = oneshot(
    seeded().await,
    "PUT",
    "/familyMembers/9",
    Some(json!({ "firstName": "Nobody" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_returns_removed_record() {
  let store = seeded().await;
  let (status, body) = oneshot(store.clone(), "DELETE", "/familyMembers/1", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["firstName"], "Ada");

  let remaining = store.snapshot();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].first_name, "Byron");

  let (status, _) = oneshot(store, "DELETE", "/familyMembers/1", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Mounting ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mounted_under_base_path() {
  for base in ["/api/v1", "api/v1/", "/api/v1/"] {
    let app = mounted_router(Arc::new(seeded().await), base);
    let req = Request::builder()
      .uri("/api/v1/familyMembers")
      .body(Body::empty())
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "base path {base:?}");
  }
}

#[tokio::test]
async fn root_mount() {
  let app = mounted_router(Arc::new(seeded().await), "/");
  let req = Request::builder()
    .uri("/familyMembers")
    .body(Body::empty())
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}
