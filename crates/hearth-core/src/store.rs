//! The `RecordStore` trait.
//!
//! Implemented by the in-memory and SQLite backends behind the API server, and
//! by the HTTP client that talks to a remote collection. The view controller
//! depends on this abstraction only.

use std::future::Future;

use crate::record::{Record, RecordFields, RecordId};

/// A collection of family-member records addressed by store-assigned ids.
///
/// No method retries or caches. `None` means the store reports no record at
/// that id.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every record currently stored, in store order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// A single record by id.
  fn get(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Store a new record. The store assigns the id and returns the stored
  /// representation.
  fn create(
    &self,
    fields: RecordFields,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Replace every field of the record at `id`.
  fn update(
    &self,
    id: RecordId,
    fields: RecordFields,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Remove the record at `id`, returning it when the store reports it.
  fn delete(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;
}
