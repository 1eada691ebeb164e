//! Student record types: the canonical shape every import path and every
//! admin edit converges on.
//!
//! Field names serialise in camelCase so the JSON wire shape matches the
//! document layout recruiters and admin tooling already consume.

use std::str::FromStr as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// The four programmes the portal knows about.
///
/// Parsing is case-insensitive and accepts the short forms used in
/// spreadsheets (`CSE`, `AIML`, `DS`, `Cyber`).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  AsRefStr,
  Serialize,
  Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Branch {
  #[strum(to_string = "Computer Science & Engineering", serialize = "CSE")]
  #[serde(rename = "Computer Science & Engineering")]
  ComputerScience,
  #[strum(to_string = "AI/ML", serialize = "AIML", serialize = "AI-ML")]
  #[serde(rename = "AI/ML")]
  AiMl,
  #[strum(to_string = "Data Science", serialize = "DS")]
  #[serde(rename = "Data Science")]
  DataScience,
  #[strum(to_string = "Cyber Security", serialize = "Cyber", serialize = "Cybersecurity")]
  #[serde(rename = "Cyber Security")]
  CyberSecurity,
}

/// Engagement types a student may list under `preferences.jobType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum JobType {
  #[strum(to_string = "Full-time")]
  FullTime,
  #[strum(to_string = "Part-time")]
  PartTime,
  Internship,
  Contract,
  Freelance,
  Research,
  Apprenticeship,
}

// ─── Sub-entities ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
  pub title:       String,
  pub description: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub date:        Option<String>,
  /// URL of a certificate or proof document.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub certificate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
  pub company:     String,
  pub role:        String,
  /// Free text, e.g. "Jun 2024 - Aug 2024".
  pub duration:    String,
  pub description: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub certificate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
  pub title:        String,
  pub description:  String,
  pub tech_stack:   Vec<String>,
  pub links:        Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub github_url:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub live_preview: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
  pub name:        String,
  pub issuer:      String,
  pub year:        i32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub certificate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchPublication {
  pub title:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub journal:   Option<String>,
  pub year:      i32,
  pub authors:   Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub paper_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
  pub email: String,
  pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub github:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub linkedin:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
  pub location:   Vec<String>,
  /// Each entry must parse as a [`JobType`].
  pub job_type:   Vec<String>,
  pub role:       Vec<String>,
  pub industries: Vec<String>,
}

// ─── StudentRecord ───────────────────────────────────────────────────────────

/// The canonical student profile.
///
/// `branch` is kept as free text so that an import can carry an unknown value
/// through to the store, which rejects it; see
/// [`StudentRecord::schema_violations`](crate::schema).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentRecord {
  pub name:                   String,
  pub branch:                 String,
  /// Free-form academic batch, conventionally "YYYY-YY".
  pub batch:                  String,
  pub semester:               i32,
  pub specialization:         String,
  pub cgpa:                   f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub previous_semester_cgpa: Option<f64>,
  pub overview:               String,
  pub achievements:           Vec<Achievement>,
  pub skills:                 Vec<String>,
  pub experience:             Vec<Experience>,
  pub projects:               Vec<Project>,
  pub certifications:         Vec<Certification>,
  pub research_publications:  Vec<ResearchPublication>,
  pub contact:                Contact,
  pub social_links:           SocialLinks,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub resume_url:             Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub profile_photo:          Option<String>,
  /// Ordered; rendered as badges.
  pub tags:                   Vec<String>,
  pub languages_known:        Vec<String>,
  pub preferences:            Preferences,
}

impl Default for StudentRecord {
  fn default() -> Self {
    Self {
      name:                   String::new(),
      branch:                 String::new(),
      batch:                  String::new(),
      semester:               1,
      specialization:         String::new(),
      cgpa:                   0.0,
      previous_semester_cgpa: None,
      overview:               String::new(),
      achievements:           Vec::new(),
      skills:                 Vec::new(),
      experience:             Vec::new(),
      projects:               Vec::new(),
      certifications:         Vec::new(),
      research_publications:  Vec::new(),
      contact:                Contact::default(),
      social_links:           SocialLinks::default(),
      resume_url:             None,
      profile_photo:          None,
      tags:                   Vec::new(),
      languages_known:        vec!["English".to_owned()],
      preferences:            Preferences::default(),
    }
  }
}

impl StudentRecord {
  /// Replace a known branch alias (`CSE`, `ds`, …) with the full branch name.
  /// Unknown values are left alone for the schema check to reject.
  pub fn canonicalize_branch(&mut self) {
    if let Ok(branch) = Branch::from_str(self.branch.trim()) {
      self.branch = branch.to_string();
    }
  }

  /// The logical identity used by reconciliation.
  pub fn dedup_key(&self) -> DedupKey {
    DedupKey {
      email: self.contact.email.clone(),
      name:  self.name.clone(),
      batch: self.batch.clone(),
    }
  }
}

/// Matches a stored student whose `contact.email` equals `email`, or whose
/// `(name, batch)` pair equals `(name, batch)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
  pub email: String,
  pub name:  String,
  pub batch: String,
}

// ─── StoredStudent ───────────────────────────────────────────────────────────

/// A persisted student: the record plus store-assigned identity and
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStudent {
  pub id:         Uuid,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub record:     StudentRecord,
}
