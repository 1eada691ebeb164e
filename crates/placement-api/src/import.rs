//! Spreadsheet import endpoints.
//!
//! `POST /admin/import/excel` takes a multipart form with a `file` part and
//! an optional `clearExisting` part (`"true"` to wipe the store first).
//! `GET /admin/import/template` downloads an example workbook.

use axum::{
  extract::{Multipart, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use placement_core::{import::ImportBatchResult, store::StudentStore};
use placement_import::{
  ImportOptions, SheetOptions, decode_workbook, run_import, template_workbook,
};
use serde_json::json;

use crate::{ApiState, Envelope, error::ApiError};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const TEMPLATE_NAME: &str = "student_import_template.xlsx";

struct Upload {
  file_name: String,
  bytes:     Vec<u8>,
}

fn is_excel(file_name: &str) -> bool {
  let lower = file_name.to_ascii_lowercase();
  lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// `POST /admin/import/excel`
pub async fn excel<S>(
  State(state): State<ApiState<S>>,
  mut form: Multipart,
) -> Result<Envelope<ImportBatchResult>, ApiError>
where
  S: StudentStore + 'static,
{
  let mut upload: Option<Upload> = None;
  let mut clear_existing = false;

  while let Some(field) = form
    .next_field()
    .await
    .map_err(|e| ApiError::bad_request(e.body_text()))?
  {
    let name = field.name().unwrap_or_default().to_owned();
    match name.as_str() {
      "file" => {
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let bytes = field
          .bytes()
          .await
          .map_err(|e| ApiError::bad_request(e.body_text()))?;
        upload = Some(Upload { file_name, bytes: bytes.to_vec() });
      }
      "clearExisting" => {
        let text = field
          .text()
          .await
          .map_err(|e| ApiError::bad_request(e.body_text()))?;
        clear_existing = text.trim() == "true";
      }
      _ => {}
    }
  }

  let upload = upload
    .filter(|u| !u.bytes.is_empty())
    .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
  if !is_excel(&upload.file_name) {
    return Err(ApiError::bad_request("Please upload an Excel file (.xlsx or .xls)"));
  }

  let sheet = decode_workbook(&upload.bytes, &SheetOptions::default())?;
  if sheet.rows.is_empty() {
    return Err(ApiError::bad_request("No data found in Excel file"));
  }
  tracing::info!(
    file = %upload.file_name,
    sheet = %sheet.name,
    rows = sheet.rows.len(),
    clear_existing,
    "spreadsheet upload"
  );

  let options = ImportOptions {
    clear_existing,
    dry_run: false,
    strategy: state.strategy,
  };
  let result = run_import(state.store.clone(), sheet.rows, options).await?;

  Ok(Envelope::ok(result).with_message("Excel import completed"))
}

/// `GET /admin/import/template`
pub async fn template() -> Response {
  match template_workbook() {
    Ok(bytes) => (
      [
        (header::CONTENT_TYPE, XLSX_MIME.to_owned()),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=\"{TEMPLATE_NAME}\""),
        ),
      ],
      bytes,
    )
      .into_response(),
    Err(e) => {
      tracing::error!(error = %e, "template generation failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({ "success": false, "error": "Failed to generate template" })),
      )
        .into_response()
    }
  }
}
