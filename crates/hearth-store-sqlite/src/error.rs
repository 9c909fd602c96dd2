//! Error type for `hearth-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("database schema version {found} is newer than supported version {supported}")]
  UnsupportedSchema { found: i64, supported: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
