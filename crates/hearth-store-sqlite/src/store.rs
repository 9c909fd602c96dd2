//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use hearth_core::{Record, RecordFields, RecordId, RecordStore};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  schema::{SCHEMA, SCHEMA_VERSION},
};

const COLUMNS: &str = "id, first_name, last_name, age, relationship";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record collection backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// The `user_version` recorded in the database file.
  pub async fn schema_version(&self) -> Result<i64> {
    let version = self
      .conn
      .call(|conn| {
        Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
      })
      .await?;
    Ok(version)
  }

  pub(crate) async fn init_schema(&self) -> Result<()> {
    let found = self.schema_version().await?;
    if found > SCHEMA_VERSION {
      return Err(Error::UnsupportedSchema {
        found,
        supported: SCHEMA_VERSION,
      });
    }
    if found < SCHEMA_VERSION {
      tracing::debug!(from = found, to = SCHEMA_VERSION, "applying schema");
      self
        .conn
        .call(|conn| {
          conn.execute_batch(SCHEMA)?;
          conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
          Ok(())
        })
        .await?;
    }
    Ok(())
  }
}

/// Row ids are integers; anything else cannot name a stored row.
fn row_id(id: &RecordId) -> Option<i64> {
  id.as_str().parse().ok().filter(|n| *n > 0)
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
  let id: i64 = row.get(0)?;
  Ok(Record {
    id:           RecordId::new(id.to_string()),
    first_name:   row.get(1)?,
    last_name:    row.get(2)?,
    age:          row.get(3)?,
    relationship: row.get(4)?,
  })
}

// ─── Trait impl ──────────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn list_all(&self) -> Result<Vec<Record>> {
    let records = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {COLUMNS} FROM family_members ORDER BY id"))?;
        let rows = stmt
          .query_map([], read_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(records)
  }

  async fn get(&self, id: RecordId) -> Result<Option<Record>> {
    let Some(n) = row_id(&id) else {
      return Ok(None);
    };
    let record = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM family_members WHERE id = ?1"),
              rusqlite::params![n],
              read_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(record)
  }

  async fn create(&self, fields: RecordFields) -> Result<Record> {
    let record = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO family_members (first_name, last_name, age, relationship) \
             VALUES (?1, ?2, ?3, ?4) RETURNING {COLUMNS}"
          ),
          rusqlite::params![
            fields.first_name,
            fields.last_name,
            fields.age,
            fields.relationship
          ],
          read_row,
        )?)
      })
      .await?;
    tracing::debug!(id = %record.id, "inserted record");
    Ok(record)
  }

  async fn update(
    &self,
    id: RecordId,
    fields: RecordFields,
  ) -> Result<Option<Record>> {
    let Some(n) = row_id(&id) else {
      return Ok(None);
    };
    let record = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE family_members \
                 SET first_name = ?1, last_name = ?2, age = ?3, relationship = ?4 \
                 WHERE id = ?5 RETURNING {COLUMNS}"
              ),
              rusqlite::params![
                fields.first_name,
                fields.last_name,
                fields.age,
                fields.relationship,
                n
              ],
              read_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(record)
  }

  async fn delete(&self, id: RecordId) -> Result<Option<Record>> {
    let Some(n) = row_id(&id) else {
      return Ok(None);
    };
    let record = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("DELETE FROM family_members WHERE id = ?1 RETURNING {COLUMNS}"),
              rusqlite::params![n],
              read_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(record)
  }
}
