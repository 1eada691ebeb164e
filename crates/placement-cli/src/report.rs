//! Plain-text rendering of import progress and results.

use std::fmt::Write as _;

use placement_core::import::ImportBatchResult;
use placement_import::reconcile::RowOutcome;

/// One progress line per row.
pub fn outcome_line(row: usize, name: &str, outcome: &RowOutcome) -> String {
  let name = if name.trim().is_empty() { "Unknown" } else { name };
  match outcome {
    RowOutcome::Created => format!("  row {row:>4}  created    {name}"),
    RowOutcome::Updated => format!("  row {row:>4}  updated    {name}"),
    RowOutcome::Validated => format!("  row {row:>4}  valid      {name}"),
    RowOutcome::Skipped(reasons) => {
      format!("  row {row:>4}  skipped    {name}: {}", reasons.join("; "))
    }
  }
}

/// The end-of-run summary.
pub fn summary(result: &ImportBatchResult) -> String {
  let mut out = String::new();
  let title = if result.dry_run { "Dry run complete" } else { "Import complete" };
  let _ = writeln!(out, "\n{title}");
  let _ = writeln!(out, "  total      {}", result.total);
  let _ = writeln!(out, "  processed  {}", result.processed);
  let _ = writeln!(out, "  created    {}", result.created);
  let _ = writeln!(out, "  updated    {}", result.updated);
  let _ = writeln!(out, "  skipped    {}", result.skipped);

  if !result.errors.is_empty() {
    let _ = writeln!(out, "\nErrors");
    for e in &result.errors {
      let _ = writeln!(out, "  row {} ({})", e.row, e.name);
      for reason in &e.errors {
        let _ = writeln!(out, "    - {reason}");
      }
    }
  }
  out
}
