//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! the record itself compact JSON.

use chrono::{DateTime, Utc};
use placement_core::student::{StoredStudent, StudentRecord};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for an INSERT or UPDATE of one student.
pub struct StudentColumns {
  pub id:             String,
  pub created_at:     String,
  pub updated_at:     String,
  pub name:           String,
  pub branch:         String,
  pub batch:          String,
  pub semester:       i32,
  pub specialization: String,
  pub cgpa:           f64,
  pub email:          String,
  pub document:       String,
}

impl StudentColumns {
  pub fn from_stored(stored: &StoredStudent) -> Result<Self> {
    let r = &stored.record;
    Ok(Self {
      id:             encode_uuid(stored.id),
      created_at:     encode_dt(stored.created_at),
      updated_at:     encode_dt(stored.updated_at),
      name:           r.name.clone(),
      branch:         r.branch.clone(),
      batch:          r.batch.clone(),
      semester:       r.semester,
      specialization: r.specialization.clone(),
      cgpa:           r.cgpa,
      email:          r.contact.email.clone(),
      document:       serde_json::to_string(r)?,
    })
  }
}

/// Raw strings read directly from a `students` row.
pub struct RawStudent {
  pub id:         String,
  pub created_at: String,
  pub updated_at: String,
  pub document:   String,
}

impl RawStudent {
  /// Columns selected by every read, in the order [`Self::from_row`] expects.
  pub const COLUMNS: &'static str = "id, created_at, updated_at, document";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      created_at: row.get(1)?,
      updated_at: row.get(2)?,
      document:   row.get(3)?,
    })
  }

  pub fn into_stored(self) -> Result<StoredStudent> {
    let record: StudentRecord = serde_json::from_str(&self.document)?;
    Ok(StoredStudent {
      id: decode_uuid(&self.id)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      record,
    })
  }
}
