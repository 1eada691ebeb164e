//! Import orchestrator: normalize → parse entries → validate → reconcile over
//! a batch of rows, producing one [`ImportBatchResult`].

use std::{collections::HashMap, sync::Arc};

use placement_core::{import::ImportBatchResult, store::StudentStore, student::StudentRecord};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::task::JoinSet;

use crate::{
  Error, Result,
  multi::parse_entries,
  normalize::{Candidate, normalize},
  reconcile::{RowOutcome, reconcile, tally},
  row::RawRow,
  validate::validate,
};

/// How validated rows are written.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileStrategy {
  /// One row at a time, in row order.
  #[default]
  Sequential,
  /// Rows that share an email or a `(name, batch)` within the batch, or that
  /// match the same stored student before the import starts, are grouped and
  /// written in row order by one task; groups run concurrently. Within one
  /// import this gives the same outcome as `Sequential`. Two imports running
  /// at once can still race each other.
  Concurrent,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
  /// Delete every stored student before the first row. Ignored in a dry run.
  pub clear_existing: bool,
  /// Normalize and validate only.
  pub dry_run:        bool,
  pub strategy:       ReconcileStrategy,
}

/// Normalize a row and rebuild its sub-entities.
pub fn prepare(row: &RawRow) -> Candidate {
  let mut candidate = normalize(row);
  parse_entries(row, &mut candidate.record);
  candidate
}

/// Run an import without progress reporting.
pub async fn run_import<S>(
  store: Arc<S>,
  rows: Vec<RawRow>,
  options: ImportOptions,
) -> Result<ImportBatchResult>
where
  S: StudentStore + 'static,
{
  run_import_with_progress(store, rows, options, |_, _, _| {}).await
}

/// Run an import, calling `progress(row, name, outcome)` once per row.
///
/// Rows are numbered from 1. Only a problem before the first row is an
/// error: an empty batch, or a failure to clear the store.
pub async fn run_import_with_progress<S, F>(
  store: Arc<S>,
  rows: Vec<RawRow>,
  options: ImportOptions,
  mut progress: F,
) -> Result<ImportBatchResult>
where
  S: StudentStore + 'static,
  F: FnMut(usize, &str, &RowOutcome) + Send,
{
  if rows.is_empty() {
    return Err(Error::NoRows);
  }

  let mut result = ImportBatchResult::new(rows.len());
  result.dry_run = options.dry_run;

  tracing::info!(
    rows = rows.len(),
    dry_run = options.dry_run,
    clear_existing = options.clear_existing,
    strategy = %options.strategy,
    "starting import"
  );

  if options.clear_existing && !options.dry_run {
    let removed = store
      .delete_all()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    tracing::info!(removed, "cleared existing students");
  }

  let mut record_row = |row: usize, name: &str, outcome: RowOutcome| {
    match &outcome {
      RowOutcome::Skipped(reasons) => tracing::warn!(row, student = name, ?reasons, "row skipped"),
      other => tracing::debug!(row, student = name, outcome = ?other, "row done"),
    }
    progress(row, name, &outcome);
    tally(&mut result, row, name, outcome);
  };

  // Validation is pure; do it up front for every strategy.
  let mut valid: Vec<(usize, StudentRecord)> = Vec::new();
  let mut invalid: Vec<(usize, String, Vec<String>)> = Vec::new();
  for (i, raw) in rows.iter().enumerate() {
    let candidate = prepare(raw);
    let verdict = validate(&candidate);
    if verdict.is_valid() {
      valid.push((i + 1, candidate.record));
    } else {
      invalid.push((i + 1, candidate.record.name, verdict.errors));
    }
  }

  if options.dry_run {
    let mut outcomes: Vec<(usize, String, RowOutcome)> = valid
      .into_iter()
      .map(|(row, record)| (row, record.name, RowOutcome::Validated))
      .chain(skips(invalid))
      .collect();
    outcomes.sort_by_key(|(row, ..)| *row);
    for (row, name, outcome) in outcomes {
      record_row(row, &name, outcome);
    }
  } else {
    match options.strategy {
      ReconcileStrategy::Sequential => {
        let mut invalid = invalid.into_iter().peekable();
        for (row, record) in valid {
          while let Some((skip_row, name, errors)) = invalid.next_if(|(r, ..)| *r < row) {
            record_row(skip_row, &name, RowOutcome::Skipped(errors));
          }
          let name = record.name.clone();
          let outcome = RowOutcome::from_reconciled(reconcile(store.as_ref(), record).await);
          record_row(row, &name, outcome);
        }
        for (row, name, errors) in invalid {
          record_row(row, &name, RowOutcome::Skipped(errors));
        }
      }
      ReconcileStrategy::Concurrent => {
        let matched = stored_matches(&store, &valid).await;
        let mut tasks = JoinSet::new();
        for group in group_by_identity(valid, &matched) {
          let store = Arc::clone(&store);
          tasks.spawn(async move {
            let mut done = Vec::with_capacity(group.len());
            for (row, record) in group {
              let name = record.name.clone();
              let outcome = RowOutcome::from_reconciled(reconcile(store.as_ref(), record).await);
              done.push((row, name, outcome));
            }
            done
          });
        }

        let mut outcomes: Vec<(usize, String, RowOutcome)> = skips(invalid).collect();
        while let Some(done) = tasks.join_next().await {
          outcomes.extend(done?);
        }
        outcomes.sort_by_key(|(row, ..)| *row);
        for (row, name, outcome) in outcomes {
          record_row(row, &name, outcome);
        }
      }
    }
  }

  tracing::info!(
    total = result.total,
    processed = result.processed,
    created = result.created,
    updated = result.updated,
    skipped = result.skipped,
    "import finished"
  );
  Ok(result)
}

fn skips(
  invalid: Vec<(usize, String, Vec<String>)>,
) -> impl Iterator<Item = (usize, String, RowOutcome)> {
  invalid
    .into_iter()
    .map(|(row, name, errors)| (row, name, RowOutcome::Skipped(errors)))
}

/// Id of the stored student each row matches right now. A failed lookup
/// counts as no match; the row's own reconcile reports the failure.
async fn stored_matches<S>(store: &Arc<S>, rows: &[(usize, StudentRecord)]) -> Vec<Option<String>>
where
  S: StudentStore + 'static,
{
  let mut lookups = JoinSet::new();
  for (i, (_, record)) in rows.iter().enumerate() {
    let store = Arc::clone(store);
    let key = record.dedup_key();
    lookups.spawn(async move {
      let found = match store.find_match(&key).await {
        Ok(found) => found.map(|stored| stored.id.to_string()),
        Err(e) => {
          tracing::debug!(error = %e, "match lookup failed");
          None
        }
      };
      (i, found)
    });
  }

  let mut matched = vec![None; rows.len()];
  while let Some(joined) = lookups.join_next().await {
    if let Ok((i, found)) = joined {
      matched[i] = found;
    }
  }
  matched
}

/// Partition rows so that any two sharing an email, a `(name, batch)` or a
/// stored match, directly or through a chain of other rows, land in the same
/// group. Groups and the rows inside them keep input order.
fn group_by_identity(
  rows: Vec<(usize, StudentRecord)>,
  matched: &[Option<String>],
) -> Vec<Vec<(usize, StudentRecord)>> {
  fn root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
      parent[i] = parent[parent[i]];
      i = parent[i];
    }
    i
  }

  let mut parent: Vec<usize> = (0..rows.len()).collect();
  let mut owners: HashMap<(u8, String, String), usize> = HashMap::new();

  for (i, (_, record)) in rows.iter().enumerate() {
    let key = record.dedup_key();
    let stored = matched.get(i).cloned().flatten().map(|id| (2, id, String::new()));
    let keys = [Some((0, key.email, String::new())), Some((1, key.name, key.batch)), stored];
    for k in keys.into_iter().flatten() {
      let first = *owners.entry(k).or_insert(i);
      let (a, b) = (root(&mut parent, first), root(&mut parent, i));
      if a != b {
        parent[a.max(b)] = a.min(b);
      }
    }
  }

  let mut groups: Vec<Vec<(usize, StudentRecord)>> = Vec::new();
  let mut slot: HashMap<usize, usize> = HashMap::new();
  for (i, row) in rows.into_iter().enumerate() {
    let r = root(&mut parent, i);
    let g = *slot.entry(r).or_insert_with(|| {
      groups.push(Vec::new());
      groups.len() - 1
    });
    groups[g].push(row);
  }
  groups
}
