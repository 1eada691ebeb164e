//! Request-level failures of the import pipeline.
//!
//! Row-level problems never surface here; they are recorded in the
//! [`ImportBatchResult`](placement_core::import::ImportBatchResult).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no rows to import")]
  NoRows,

  #[error("unreadable spreadsheet: {0}")]
  Spreadsheet(#[from] calamine::Error),

  #[error("workbook has no worksheets")]
  NoWorksheets,

  #[error("sheet {name:?} not found; available sheets: {}", .available.join(", "))]
  SheetNotFound { name: String, available: Vec<String> },

  #[error("row {index} is not a JSON object")]
  NotAnObject { index: usize },

  #[error("could not write template workbook: {0}")]
  Template(#[from] rust_xlsxwriter::XlsxError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("reconcile task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
