//! Error types for `hearth-core`.

use thiserror::Error;

use crate::record::RecordId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("duplicate record id: {0}")]
  DuplicateId(RecordId),

  #[error("record id \"{0}\" is reserved for records not yet created")]
  ReservedId(RecordId),

  #[error("record ids exhausted: the highest id in use is {0}")]
  IdsExhausted(u64),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
