//! The outcome of one import call.
//!
//! Transient: built by the import orchestrator, returned to the caller,
//! never persisted.

use serde::{Deserialize, Serialize};

/// Why one input row did not end up in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
  /// 1-based position of the row in the input (header excluded).
  pub row:    usize,
  /// Best-effort student name, or `"Unknown"`.
  pub name:   String,
  pub errors: Vec<String>,
}

/// Aggregate counts for an import batch.
///
/// After a committing import, `processed == created + updated` and
/// `processed + skipped == total`. In a dry run nothing is written, so
/// `processed` counts the rows that passed validation and `created` and
/// `updated` stay zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBatchResult {
  pub total:     usize,
  pub processed: usize,
  pub created:   usize,
  pub updated:   usize,
  pub skipped:   usize,
  /// Ordered by `row`.
  pub errors:    Vec<RowError>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub dry_run:   bool,
}

impl ImportBatchResult {
  pub fn new(total: usize) -> Self { Self { total, ..Self::default() } }

  pub fn record_skip(&mut self, row: usize, name: &str, errors: Vec<String>) {
    let name = if name.trim().is_empty() { "Unknown" } else { name };
    self.errors.push(RowError { row, name: name.to_owned(), errors });
    self.skipped += 1;
  }
}
