//! Error types for `placement-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The record breaks one or more storage-level constraints.
  /// The payload is the list of individual violations.
  #[error("student validation failed: {}", .0.join(", "))]
  SchemaViolation(Vec<String>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
