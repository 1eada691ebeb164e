//! Student management handlers.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/admin/students` | Body: a full student record |
//! | `PUT`    | `/admin/students` | Body: `{"students": [...], "clearExisting": bool}` |
//! | `PUT`    | `/admin/students/{id}` | Body: top-level fields to overwrite |
//! | `DELETE` | `/admin/students/{id}` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use placement_core::{
  import::ImportBatchResult,
  store::StudentStore,
  student::{StoredStudent, StudentRecord},
};
use placement_import::{ImportOptions, rows_from_json, run_import};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{ApiState, Envelope, error::ApiError, students::parse_id};

/// Fields a new record must carry. Checked before deserialising so the
/// caller gets the field name rather than a serde message.
const REQUIRED_FIELDS: [&str; 7] =
  ["name", "branch", "batch", "semester", "specialization", "cgpa", "contact"];

/// Keys a merge may not overwrite.
const PROTECTED_FIELDS: [&str; 4] = ["id", "_id", "createdAt", "updatedAt"];

fn is_missing(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.trim().is_empty(),
    Some(Value::Object(m)) => m.is_empty(),
    Some(_) => false,
  }
}

fn record_from(value: Value) -> Result<StudentRecord, ApiError> {
  let record: StudentRecord = serde_json::from_value(value)
    .map_err(|e| ApiError::bad_request(format!("Invalid student data: {e}")))?;
  record
    .check_schema()
    .map_err(|e| ApiError::bad_request(e.to_string()))?;
  Ok(record)
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /admin/students`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudentStore + 'static,
{
  for field in REQUIRED_FIELDS {
    if is_missing(body.get(field)) {
      return Err(ApiError::bad_request(format!("Missing required field: {field}")));
    }
  }

  let record = record_from(body)?;
  let student = state.store.create(record).await.map_err(ApiError::store)?;
  tracing::info!(id = %student.id, name = %student.record.name, "student created");

  Ok((
    StatusCode::CREATED,
    Envelope::ok(student).with_message("Student created successfully"),
  ))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /admin/students/{id}`
///
/// Top-level keys in the body replace the stored values; nested objects are
/// replaced whole, not merged.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Json(body): Json<Value>,
) -> Result<Envelope<StoredStudent>, ApiError>
where
  S: StudentStore + 'static,
{
  let id = parse_id(&id, "Invalid student ID")?;
  let Value::Object(changes) = body else {
    return Err(ApiError::bad_request("Request body must be a JSON object"));
  };

  let existing = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;

  let merged = merge(&existing.record, changes)?;
  let record = record_from(merged)?;

  let updated = state
    .store
    .update_by_id(id, record)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
  tracing::info!(%id, "student updated");

  Ok(Envelope::ok(updated).with_message("Student updated successfully"))
}

fn merge(record: &StudentRecord, changes: Map<String, Value>) -> Result<Value, ApiError> {
  let mut merged = match serde_json::to_value(record) {
    Ok(Value::Object(map)) => map,
    Ok(_) => Map::new(),
    Err(e) => return Err(ApiError::Store(Box::new(e))),
  };
  for (key, value) in changes {
    if !PROTECTED_FIELDS.contains(&key.as_str()) {
      merged.insert(key, value);
    }
  }
  Ok(Value::Object(merged))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /admin/students/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Envelope<Value>, ApiError>
where
  S: StudentStore + 'static,
{
  let id = parse_id(&id, "Invalid student ID")?;
  let removed = state
    .store
    .delete_by_id(id)
    .await
    .map_err(ApiError::store)?;
  if !removed {
    return Err(ApiError::NotFound("Student not found".into()));
  }
  tracing::info!(%id, "student deleted");

  Ok(Envelope::ok(Value::Null).with_message("Student deleted successfully"))
}

// ─── Bulk ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkBody {
  #[serde(default)]
  pub students:       Vec<Value>,
  #[serde(default)]
  pub clear_existing: bool,
}

/// `PUT /admin/students`, the JSON bulk import path.
pub async fn bulk<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<BulkBody>,
) -> Result<Envelope<ImportBatchResult>, ApiError>
where
  S: StudentStore + 'static,
{
  if body.students.is_empty() {
    return Err(ApiError::bad_request("Invalid students array"));
  }

  let rows = rows_from_json(body.students)?;
  let options = ImportOptions {
    clear_existing: body.clear_existing,
    dry_run:        false,
    strategy:       state.strategy,
  };
  let result = run_import(state.store.clone(), rows, options).await?;

  Ok(Envelope::ok(result).with_message("Bulk import completed"))
}
