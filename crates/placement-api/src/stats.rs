//! `GET /admin/stats`: dashboard aggregates.

use axum::extract::State;
use chrono::{DateTime, Utc};
use placement_core::store::{Bucket, StudentStore};
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, Envelope, error::ApiError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
  pub total_students:     u64,
  /// Rounded to two decimals; `0` for an empty store.
  pub average_cgpa:       f64,
  pub high_cgpa_students: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
  pub by_branch:         Vec<Bucket>,
  pub by_specialization: Vec<Bucket>,
}

/// The slice of a student shown in the "recently added" list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentStudent {
  pub id:         Uuid,
  pub name:       String,
  pub branch:     String,
  pub cgpa:       f64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
  pub overview:     Overview,
  pub distribution: Distribution,
  pub recent:       Vec<RecentStudent>,
}

pub async fn handler<S>(
  State(state): State<ApiState<S>>,
) -> Result<Envelope<Dashboard>, ApiError>
where
  S: StudentStore + 'static,
{
  let stats = state.store.stats().await.map_err(ApiError::store)?;

  let average = stats.average_cgpa.unwrap_or(0.0);
  Ok(Envelope::ok(Dashboard {
    overview:     Overview {
      total_students:     stats.total_students,
      average_cgpa:       (average * 100.0).round() / 100.0,
      high_cgpa_students: stats.high_cgpa_students,
    },
    distribution: Distribution {
      by_branch:         stats.by_branch,
      by_specialization: stats.by_specialization,
    },
    recent:       stats
      .recent
      .into_iter()
      .map(|s| RecentStudent {
        id:         s.id,
        name:       s.record.name,
        branch:     s.record.branch,
        cgpa:       s.record.cgpa,
        created_at: s.created_at,
      })
      .collect(),
  }))
}
