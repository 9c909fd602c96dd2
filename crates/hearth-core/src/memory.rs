//! [`MemoryStore`] — a process-local [`RecordStore`].
//!
//! Follows the id scheme of the hosted mock API: ids are decimal strings
//! handed out from `"1"` upward and never reused, so the sentinel `"0"` is
//! never assigned.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
  Error, Result,
  record::{Record, RecordFields, RecordId},
  store::RecordStore,
};

#[derive(Debug, Default)]
struct Inner {
  records: Vec<Record>,
  next_id: u64,
}

impl Inner {
  fn position(&self, id: &RecordId) -> Option<usize> {
    self.records.iter().position(|r| &r.id == id)
  }
}

/// An in-memory record collection.
///
/// Cloning is cheap; clones share the same collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Build a store holding `records` as-is, in the given order.
  ///
  /// Rejects duplicate ids and the sentinel id. Later creates continue from
  /// the highest numeric id present.
  pub fn with_records(records: Vec<Record>) -> Result<Self> {
    let mut next_id = 0;
    let mut seen = std::collections::HashSet::new();
    for record in &records {
      if record.id.is_sentinel() {
        return Err(Error::ReservedId(record.id.clone()));
      }
      if !seen.insert(&record.id) {
        return Err(Error::DuplicateId(record.id.clone()));
      }
      if let Ok(n) = record.id.as_str().parse::<u64>() {
        next_id = next_id.max(n);
      }
    }
    Ok(Self {
      inner: Arc::new(Mutex::new(Inner { records, next_id })),
    })
  }

  /// Build a store from a JSON array of records.
  pub fn from_json(raw: &str) -> Result<Self> {
    Self::with_records(serde_json::from_str(raw)?)
  }

  /// A copy of every record, in store order.
  pub fn snapshot(&self) -> Vec<Record> { self.lock().records.clone() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl RecordStore for MemoryStore {
  type Error = Error;

  async fn list_all(&self) -> Result<Vec<Record>> { Ok(self.snapshot()) }

  async fn get(&self, id: RecordId) -> Result<Option<Record>> {
    let inner = self.lock();
    Ok(inner.position(&id).map(|i| inner.records[i].clone()))
  }

  async fn create(&self, fields: RecordFields) -> Result<Record> {
    let mut inner = self.lock();
    let next_id = inner
      .next_id
      .checked_add(1)
      .ok_or(Error::IdsExhausted(inner.next_id))?;
    inner.next_id = next_id;
    let record = fields.with_id(RecordId::new(next_id.to_string()));
    inner.records.push(record.clone());
    tracing::debug!(id = %record.id, "created record");
    Ok(record)
  }

  async fn update(
    &self,
    id: RecordId,
    fields: RecordFields,
  ) -> Result<Option<Record>> {
    let mut inner = self.lock();
    let Some(i) = inner.position(&id) else {
      return Ok(None);
    };
    let record = fields.with_id(id);
    inner.records[i] = record.clone();
    Ok(Some(record))
  }

  async fn delete(&self, id: RecordId) -> Result<Option<Record>> {
    let mut inner = self.lock();
    Ok(inner.position(&id).map(|i| inner.records.remove(i)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fields(first: &str, relationship: &str) -> RecordFields {
    RecordFields {
      first_name:   first.into(),
      last_name:    "Lovelace".into(),
      age:          "30".into(),
      relationship: relationship.into(),
    }
  }

  #[tokio::test]
  async fn create_assigns_increasing_ids() {
    let store = MemoryStore::new();
    let a = store.create(fields("Ada", "Aunt")).await.unwrap();
    let b = store.create(fields("Byron", "Uncle")).await.unwrap();
    assert_eq!(a.id.as_str(), "1");
    assert_eq!(b.id.as_str(), "2");
    assert_eq!(store.list_all().await.unwrap(), vec![a, b]);
  }

  #[tokio::test]
  async fn ids_are_not_reused_after_delete() {
    let store = MemoryStore::new();
    let a = store.create(fields("Ada", "Aunt")).await.unwrap();
    store.delete(a.id.clone()).await.unwrap();
    let b = store.create(fields("Byron", "Uncle")).await.unwrap();
    assert_eq!(b.id.as_str(), "2");
  }

  #[tokio::test]
  async fn update_replaces_fields_in_place() {
    let store = MemoryStore::new();
    let a = store.create(fields("Ada", "Aunt")).await.unwrap();
    store.create(fields("Byron", "Uncle")).await.unwrap();

    let updated = store
      .update(a.id.clone(), fields("Ada", "Grandmother"))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(updated.id, a.id);
    assert_eq!(updated.relationship, "Grandmother");

    let all = store.list_all().await.unwrap();
    assert_eq!(all[0], updated);
    assert_eq!(all.len(), 2);
  }

  #[tokio::test]
  async fn missing_ids_report_none() {
    let store = MemoryStore::new();
    let id = RecordId::new("99");
    assert!(store.get(id.clone()).await.unwrap().is_none());
    assert!(
      store
        .update(id.clone(), fields("Ada", "Aunt"))
        .await
        .unwrap()
        .is_none()
    );
    assert!(store.delete(id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn seeded_store_continues_numbering() {
    let store = MemoryStore::from_json(
      r#"[{"firstName":"Ada","id":"4"},{"firstName":"Byron","id":"9"}]"#,
    )
    .unwrap();
    let c = store.create(fields("Charles", "Cousin")).await.unwrap();
    assert_eq!(c.id.as_str(), "10");
  }

  #[tokio::test]
  async fn create_after_largest_id_reports_exhaustion() {
    let store = MemoryStore::from_json(
      r#"[{"firstName":"Ada","id":"18446744073709551615"}]"#,
    )
    .unwrap();

    let err = store.create(fields("Byron", "Uncle")).await.unwrap_err();
    assert!(matches!(err, Error::IdsExhausted(u64::MAX)));

    // The store stays usable and unchanged.
    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].first_name, "Ada");
  }

  #[test]
  fn seed_rejects_duplicates_and_sentinel() {
    let dup = MemoryStore::from_json(r#"[{"id":"1"},{"id":"1"}]"#);
    assert!(matches!(dup, Err(Error::DuplicateId(_))));

    let sentinel = MemoryStore::from_json(r#"[{"id":"0"}]"#);
    assert!(matches!(sentinel, Err(Error::ReservedId(_))));
  }
}
