//! Reconciliation: insert-or-update one validated record by dedup key, and
//! fold per-row outcomes into an [`ImportBatchResult`].

use placement_core::{
  import::ImportBatchResult,
  store::StudentStore,
  student::{StoredStudent, StudentRecord},
};

/// What happened to a record that reached the store.
#[derive(Debug, Clone)]
pub enum Reconciled {
  Created(StoredStudent),
  Updated(StoredStudent),
}

/// Write `record`, replacing the first stored student that shares its email
/// or its `(name, batch)`, or inserting it when there is none.
///
/// The update is a full replacement of the stored document. The lookup and
/// the write are separate store calls; nothing makes the pair atomic.
pub async fn reconcile<S: StudentStore>(
  store: &S,
  record: StudentRecord,
) -> Result<Reconciled, S::Error> {
  let key = record.dedup_key();
  if let Some(existing) = store.find_match(&key).await? {
    // A match deleted between lookup and write is re-inserted.
    if let Some(updated) = store.update_by_id(existing.id, record.clone()).await? {
      return Ok(Reconciled::Updated(updated));
    }
  }
  Ok(Reconciled::Created(store.create(record).await?))
}

/// Final disposition of one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
  Created,
  Updated,
  /// Passed validation in a dry run; nothing was written.
  Validated,
  Skipped(Vec<String>),
}

impl RowOutcome {
  /// A reconciliation result as a row outcome; a store error becomes a skip
  /// whose only reason is the error's message.
  pub fn from_reconciled<E: std::fmt::Display>(result: Result<Reconciled, E>) -> Self {
    match result {
      Ok(Reconciled::Created(_)) => RowOutcome::Created,
      Ok(Reconciled::Updated(_)) => RowOutcome::Updated,
      Err(e) => RowOutcome::Skipped(vec![e.to_string()]),
    }
  }
}

/// Count one row into `result`.
pub fn tally(result: &mut ImportBatchResult, row: usize, name: &str, outcome: RowOutcome) {
  match outcome {
    RowOutcome::Created => {
      result.processed += 1;
      result.created += 1;
    }
    RowOutcome::Updated => {
      result.processed += 1;
      result.updated += 1;
    }
    RowOutcome::Validated => result.processed += 1,
    RowOutcome::Skipped(errors) => result.record_skip(row, name, errors),
  }
}
