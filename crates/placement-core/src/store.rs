//! The `StudentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `placement-store-sqlite`). Higher layers (`placement-import`,
//! `placement-api`) depend on this abstraction, not on any concrete backend.
//!
//! A store is opened once per process and shared behind an `Arc`; every
//! method takes `&self`.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::EnumString;
use uuid::Uuid;

use crate::student::{DedupKey, StoredStudent, StudentRecord};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Columns the recruiter directory can be sorted by.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
  #[default]
  Cgpa,
  Name,
  Batch,
  Semester,
  Specialization,
  CreatedAt,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

/// Parameters for [`StudentStore::list`].
#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
  /// Case-insensitive substring match on specialization.
  pub specialization: Option<String>,
  /// Case-insensitive substring match on branch.
  pub branch:         Option<String>,
  pub batch:          Option<String>,
  pub semester:       Option<i32>,
  pub cgpa_gte:       Option<f64>,
  pub cgpa_lte:       Option<f64>,
  /// Match students carrying any of these tags.
  pub tags:           Vec<String>,
  /// Match students listing any of these skills.
  pub skills:         Vec<String>,
  pub sort_by:        SortField,
  pub sort_order:     SortOrder,
  pub limit:          usize,
  pub offset:         usize,
}

impl StudentQuery {
  /// How many filter criteria are set.
  pub fn filter_count(&self) -> usize {
    [
      self.specialization.is_some(),
      self.branch.is_some(),
      self.batch.is_some(),
      self.semester.is_some(),
      self.cgpa_gte.is_some() || self.cgpa_lte.is_some(),
      !self.tags.is_empty(),
      !self.skills.is_empty(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count()
  }
}

/// One page of [`StudentStore::list`] results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentPage {
  pub students: Vec<StoredStudent>,
  /// Number of students matching the filter, ignoring pagination.
  pub total:    u64,
}

/// A `(value, count)` bucket in a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
  #[serde(rename = "_id")]
  pub value: String,
  pub count: u64,
}

/// Aggregates for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
  pub total_students:     u64,
  pub average_cgpa:       Option<f64>,
  /// Students with cgpa ≥ [`HIGH_CGPA_THRESHOLD`].
  pub high_cgpa_students: u64,
  pub by_branch:          Vec<Bucket>,
  pub by_specialization:  Vec<Bucket>,
  /// Most recently created first.
  pub recent:             Vec<StoredStudent>,
}

pub const HIGH_CGPA_THRESHOLD: f64 = 8.5;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a student document store.
///
/// Writes are single-document and atomic; nothing here spans documents. In
/// particular `find_match` followed by `create` is not atomic, and callers
/// that need in-batch dedup must serialise rows themselves.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StudentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The first stored student (in insertion order) whose email equals
  /// `key.email`, or whose `(name, batch)` equals `(key.name, key.batch)`.
  fn find_match<'a>(
    &'a self,
    key: &'a DedupKey,
  ) -> impl Future<Output = Result<Option<StoredStudent>, Self::Error>> + Send + 'a;

  /// Insert a new student. Fails if the record has schema violations.
  fn create(
    &self,
    record: StudentRecord,
  ) -> impl Future<Output = Result<StoredStudent, Self::Error>> + Send + '_;

  /// Replace the stored record for `id`, keeping its identity and creation
  /// time. Returns `None` if no such student exists. Fails if the record has
  /// schema violations.
  fn update_by_id(
    &self,
    id: Uuid,
    record: StudentRecord,
  ) -> impl Future<Output = Result<Option<StoredStudent>, Self::Error>> + Send + '_;

  /// Delete every student. Returns the number removed.
  fn delete_all(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete one student. Returns `false` if it did not exist.
  fn delete_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StoredStudent>, Self::Error>> + Send + '_;

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Filter, sort and paginate the directory.
  fn list<'a>(
    &'a self,
    query: &'a StudentQuery,
  ) -> impl Future<Output = Result<StudentPage, Self::Error>> + Send + 'a;

  /// Free-text search over name, skills, specialization and overview; best
  /// cgpa first.
  fn search<'a>(
    &'a self,
    text: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<StoredStudent>, Self::Error>> + Send + 'a;

  fn stats(&self) -> impl Future<Output = Result<StudentStats, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_count_treats_cgpa_bounds_as_one() {
    let query = StudentQuery {
      cgpa_gte: Some(7.0),
      cgpa_lte: Some(9.0),
      tags: vec!["AI/ML".into()],
      ..StudentQuery::default()
    };
    assert_eq!(query.filter_count(), 2);
    assert_eq!(StudentQuery::default().filter_count(), 0);
  }

  #[test]
  fn sort_field_deserialises_camel_case() {
    let field: SortField = serde_json::from_str("\"createdAt\"").unwrap();
    assert_eq!(field, SortField::CreatedAt);
    let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
    assert_eq!(order, SortOrder::Asc);
  }
}
