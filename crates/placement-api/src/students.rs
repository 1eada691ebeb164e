//! Recruiter directory handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/students` | Filters, sorting and pagination; see [`ListParams`] |
//! | `GET`  | `/students/search` | `?q=` (or `?name=`), `limit` ≤ 20 |
//! | `GET`  | `/students/{id}` | 400 on a malformed id, 404 if absent |
//! | `GET`  | `/students/{id}/resume` | 404 if the student has no resume |

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use placement_core::{
  store::{SortField, SortOrder, StudentQuery, StudentStore},
  student::StoredStudent,
};
use placement_import::normalize::split_list;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, Envelope, Principal, error::ApiError};

const DEFAULT_LIMIT: usize = 10;
const MAX_LIST_LIMIT: usize = 50;
const MAX_SEARCH_LIMIT: usize = 20;

/// Parse a path id, or fail with `message`.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(message))
}

/// Query-string values arrive as text; blanks count as absent and
/// unparseable numbers fall back to defaults.
fn param<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
  raw
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .and_then(|s| s.parse().ok())
}

fn text_param(raw: &Option<String>) -> Option<String> { param(raw) }

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page:           Option<String>,
  pub limit:          Option<String>,
  #[serde(rename = "sortBy")]
  pub sort_by:        Option<String>,
  #[serde(rename = "sortOrder")]
  pub sort_order:     Option<String>,
  pub specialization: Option<String>,
  pub branch:         Option<String>,
  pub batch:          Option<String>,
  pub semester:       Option<String>,
  pub cgpa_gte:       Option<String>,
  pub cgpa_lte:       Option<String>,
  /// Comma-separated; any-of.
  pub tags:           Option<String>,
  /// Comma-separated; any-of.
  pub skills:         Option<String>,
}

impl ListParams {
  /// The store query plus the 1-based page number.
  pub fn to_query(&self) -> (StudentQuery, usize) {
    let page = param::<usize>(&self.page).unwrap_or(1).max(1);
    let limit = param::<usize>(&self.limit)
      .unwrap_or(DEFAULT_LIMIT)
      .clamp(1, MAX_LIST_LIMIT);

    let query = StudentQuery {
      specialization: text_param(&self.specialization),
      branch: text_param(&self.branch),
      batch: text_param(&self.batch),
      semester: param(&self.semester),
      cgpa_gte: param(&self.cgpa_gte),
      cgpa_lte: param(&self.cgpa_lte),
      tags: self.tags.as_deref().map(split_list).unwrap_or_default(),
      skills: self.skills.as_deref().map(split_list).unwrap_or_default(),
      sort_by: param::<SortField>(&self.sort_by).unwrap_or_default(),
      sort_order: param::<SortOrder>(&self.sort_order).unwrap_or_default(),
      limit,
      offset: (page - 1).saturating_mul(limit),
    };
    (query, page)
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub current_page:   usize,
  pub total_pages:    u64,
  pub total_students: u64,
  pub limit:          usize,
  pub has_next_page:  bool,
  pub has_prev_page:  bool,
}

#[derive(Debug, Serialize)]
pub struct AppliedFilters {
  pub applied: bool,
  pub count:   usize,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub success:    bool,
  pub data:       Vec<StoredStudent>,
  pub pagination: Pagination,
  pub filters:    AppliedFilters,
}

/// `GET /students`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: StudentStore + 'static,
{
  let (query, page) = params.to_query();
  let result = state.store.list(&query).await.map_err(ApiError::store)?;

  let limit = query.limit;
  let total_pages = result.total.div_ceil(limit as u64);
  let count = query.filter_count();

  Ok(Json(ListResponse {
    success:    true,
    data:       result.students,
    pagination: Pagination {
      current_page: page,
      total_pages,
      total_students: result.total,
      limit,
      has_next_page: (page as u64) < total_pages,
      has_prev_page: page > 1,
    },
    filters:    AppliedFilters { applied: count > 0, count },
  }))
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  pub q:     Option<String>,
  pub name:  Option<String>,
  pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
  pub success: bool,
  pub data:    Vec<StoredStudent>,
  pub count:   usize,
  pub query:   String,
}

/// `GET /students/search?q=<text>`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: StudentStore + 'static,
{
  let text = text_param(&params.q)
    .or_else(|| text_param(&params.name))
    .ok_or_else(|| ApiError::bad_request("Search query is required"))?;
  let limit = param::<usize>(&params.limit)
    .unwrap_or(DEFAULT_LIMIT)
    .clamp(1, MAX_SEARCH_LIMIT);

  let students = state
    .store
    .search(&text, limit)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SearchResponse {
    success: true,
    count:   students.len(),
    data:    students,
    query:   text,
  }))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /students/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Envelope<StoredStudent>, ApiError>
where
  S: StudentStore + 'static,
{
  let id = parse_id(&id, "Invalid student ID format")?;
  let student = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
  Ok(Envelope::ok(student))
}

// ─── Resume ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeLink {
  pub resume_url:    String,
  pub student_name:  String,
  pub downloaded_by: Option<String>,
  pub downloaded_at: DateTime<Utc>,
}

/// `GET /students/{id}/resume`
pub async fn resume<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  principal: Option<Extension<Principal>>,
) -> Result<Envelope<ResumeLink>, ApiError>
where
  S: StudentStore + 'static,
{
  let id = parse_id(&id, "Invalid student ID format")?;
  let student = state
    .store
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;

  let resume_url = student
    .record
    .resume_url
    .ok_or_else(|| ApiError::NotFound("Resume not available for this student".into()))?;

  let downloaded_by = principal.map(|Extension(p)| p.display_name().to_owned());
  tracing::info!(%id, by = ?downloaded_by, "resume requested");

  Ok(Envelope::ok(ResumeLink {
    resume_url,
    student_name: student.record.name,
    downloaded_by,
    downloaded_at: Utc::now(),
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(page: &str, limit: &str) -> ListParams {
    ListParams {
      page: Some(page.into()),
      limit: Some(limit.into()),
      ..ListParams::default()
    }
  }

  #[test]
  fn page_and_limit_become_offset() {
    let (query, page) = params("3", "20").to_query();
    assert_eq!((page, query.limit, query.offset), (3, 20, 40));

    let (query, page) = params("0", "500").to_query();
    assert_eq!((page, query.limit, query.offset), (1, MAX_LIST_LIMIT, 0));

    let (query, page) = params("soon", " ").to_query();
    assert_eq!((page, query.limit, query.offset), (1, DEFAULT_LIMIT, 0));
  }

  #[test]
  fn enormous_page_saturates_the_offset() {
    let (query, page) = params(&usize::MAX.to_string(), "50").to_query();
    assert_eq!(page, usize::MAX);
    assert_eq!(query.offset, usize::MAX);
  }
}
