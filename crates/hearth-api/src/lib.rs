//! JSON REST API for Hearth family-member records.
//!
//! Serves the collection endpoint the terminal client talks to, backed by any
//! [`hearth_core::RecordStore`]. It mirrors the hosted mock API closely enough
//! for the client to run against either.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", hearth_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod records;

use std::sync::Arc;

use axum::{Router, routing::get};
use hearth_core::RecordStore;
use serde::Deserialize;

pub use error::ApiError;

/// Collection path, relative to the mount point.
pub const COLLECTION_PATH: &str = "/familyMembers";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Where the server keeps its records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
  /// Process-local; optionally seeded from a JSON array of records.
  #[default]
  Memory,
  /// A SQLite file, created on first use.
  Sqlite { path: std::path::PathBuf },
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `HEARTH__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:      String,
  #[serde(default = "default_port")]
  pub port:      u16,
  /// Mount point of the collection, e.g. `/api/v1`. Empty or `/` mounts it
  /// at the root.
  #[serde(default = "default_base_path")]
  pub base_path: String,
  #[serde(default)]
  pub store:     StoreConfig,
  /// JSON file of records loaded into a memory store at startup.
  #[serde(default)]
  pub seed:      Option<std::path::PathBuf>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 3000 }

fn default_base_path() -> String { "/api/v1".to_string() }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the collection router for `store`, unmounted.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route(
      COLLECTION_PATH,
      get(records::list::<S>).post(records::create::<S>),
    )
    .route(
      "/familyMembers/{id}",
      get(records::get_one::<S>)
        .put(records::update::<S>)
        .delete(records::delete::<S>),
    )
    .with_state(store)
}

/// Build the collection router mounted at `base_path`.
pub fn mounted_router<S>(store: Arc<S>, base_path: &str) -> Router<()>
where
  S: RecordStore + 'static,
{
  let base = base_path.trim_matches('/');
  if base.is_empty() {
    api_router(store)
  } else {
    Router::new().nest(&format!("/{base}"), api_router(store))
  }
}

#[cfg(test)]
mod tests;
