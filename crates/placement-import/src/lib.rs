//! Student import pipeline.
//!
//! Rows come from a spreadsheet ([`sheet::decode_workbook`]) or a JSON bulk
//! payload ([`row::rows_from_json`]) and flow through
//! [`normalize`](normalize::normalize) →
//! [`parse_entries`](multi::parse_entries) →
//! [`validate`](validate::validate) →
//! [`reconcile`](reconcile::reconcile), driven by [`run_import`].
//!
//! # Quick start
//!
//! ```no_run
//! # async fn demo<S: placement_core::store::StudentStore + 'static>(
//! #   store: std::sync::Arc<S>,
//! #   bytes: &[u8],
//! # ) -> placement_import::Result<()> {
//! use placement_import::{ImportOptions, SheetOptions, decode_workbook, run_import};
//!
//! let sheet = decode_workbook(bytes, &SheetOptions::default())?;
//! let result = run_import(store, sheet.rows, ImportOptions::default()).await?;
//! println!("{} created, {} updated, {} skipped", result.created, result.updated, result.skipped);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod headers;
pub mod multi;
pub mod normalize;
pub mod orchestrate;
pub mod reconcile;
pub mod row;
pub mod sheet;
pub mod validate;

pub use error::{Error, Result};
pub use orchestrate::{
  ImportOptions, ReconcileStrategy, run_import, run_import_with_progress,
};
pub use row::{Cell, RawRow, rows_from_json};
pub use sheet::{Sheet, SheetOptions, decode_workbook, template_workbook};
