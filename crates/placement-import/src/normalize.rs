//! Field normalizer: [`RawRow`] → candidate [`StudentRecord`].
//!
//! Pure and infallible. Unparseable numbers fall back to defaults here and
//! are caught by the validator downstream.

use placement_core::student::{Contact, Preferences, SocialLinks, StudentRecord};

use crate::{
  headers::{self, Aliases},
  row::RawRow,
};

const DEFAULT_SEMESTER: i32 = 1;

/// A normalized record plus a note of which numeric fields were defaulted
/// because their cell was missing or unparseable.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
  pub record:    StudentRecord,
  pub defaulted: Defaulted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Defaulted {
  pub semester: bool,
  pub cgpa:     bool,
}

/// Map one row onto the canonical record shape. Sub-entity sequences are
/// left empty; see [`crate::multi`].
pub fn normalize(row: &RawRow) -> Candidate {
  let mut defaulted = Defaulted::default();

  let semester = row
    .first(headers::SEMESTER)
    .and_then(|cell| cell.as_number())
    .map(|n| n.trunc() as i32)
    .unwrap_or_else(|| {
      defaulted.semester = true;
      DEFAULT_SEMESTER
    });

  let cgpa = row
    .first(headers::CGPA)
    .and_then(|cell| cell.as_number())
    .unwrap_or_else(|| {
      defaulted.cgpa = true;
      0.0
    });

  let previous_semester_cgpa = row
    .first(headers::PREVIOUS_CGPA)
    .and_then(|cell| cell.as_number());

  let mut languages_known = list(row, headers::LANGUAGES);
  if languages_known.is_empty() {
    languages_known = StudentRecord::default().languages_known;
  }

  let mut record = StudentRecord {
    name: row.text(headers::NAME),
    branch: row.text(headers::BRANCH),
    batch: row.text(headers::BATCH),
    semester,
    specialization: row.text(headers::SPECIALIZATION),
    cgpa,
    previous_semester_cgpa,
    overview: row.text(headers::OVERVIEW),
    skills: list(row, headers::SKILLS),
    contact: Contact {
      email: row.text(headers::EMAIL),
      phone: row.text(headers::PHONE),
    },
    social_links: SocialLinks {
      github:    optional(row, headers::GITHUB),
      linkedin:  optional(row, headers::LINKEDIN),
      portfolio: optional(row, headers::PORTFOLIO),
    },
    resume_url: optional(row, headers::RESUME_URL),
    profile_photo: optional(row, headers::PROFILE_PHOTO),
    tags: list(row, headers::TAGS),
    languages_known,
    preferences: Preferences {
      location:   list(row, headers::PREFERRED_LOCATIONS),
      job_type:   list(row, headers::PREFERRED_JOB_TYPES),
      role:       list(row, headers::PREFERRED_ROLES),
      industries: list(row, headers::PREFERRED_INDUSTRIES),
    },
    ..StudentRecord::default()
  };
  record.canonicalize_branch();

  Candidate { record, defaulted }
}

fn optional(row: &RawRow, aliases: Aliases) -> Option<String> {
  Some(row.text(aliases)).filter(|s| !s.is_empty())
}

fn list(row: &RawRow, aliases: Aliases) -> Vec<String> {
  split_list(&row.text(aliases))
}

/// Split on commas, trim each item and drop the empty ones.
pub fn split_list(s: &str) -> Vec<String> {
  s.split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(str::to_owned)
    .collect()
}
