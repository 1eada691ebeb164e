//! Storage-level constraints on a [`StudentRecord`].
//!
//! Stores run these checks on every create and update. They are stricter than
//! the import validator: enum membership, numeric ranges, URL shapes and
//! required sub-entity fields all live here.

use std::{str::FromStr as _, sync::LazyLock};

use regex::Regex;

use crate::{
  Error, Result,
  student::{Branch, JobType, StudentRecord},
};

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(https?://)?[\da-zA-Z.-]+\.[a-zA-Z.]{2,6}(:\d+)?([/\w .~%+&=?#@!:,;'()*\[\]$-]*)?$",
  )
  .expect("valid url regex")
});

/// Whether `s` looks like a web URL (scheme optional).
pub fn is_valid_url(s: &str) -> bool { URL_RE.is_match(s) }

/// Whether `s` looks like `local@domain.tld`.
pub fn is_valid_email(s: &str) -> bool { EMAIL_RE.is_match(s) }

/// Collects violations into a list of `path: message` strings.
struct Violations(Vec<String>);

impl Violations {
  fn required(&mut self, path: &str, value: &str) {
    if value.trim().is_empty() {
      self.0.push(format!("{path}: is required"));
    }
  }

  fn range(&mut self, path: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
      self.0.push(format!("{path}: {value} is outside {min}-{max}"));
    }
  }

  fn url(&mut self, path: &str, value: Option<&str>) {
    if let Some(v) = value
      && !is_valid_url(v)
    {
      self.0.push(format!("{path}: {v:?} is not a valid URL"));
    }
  }
}

impl StudentRecord {
  /// Every constraint the record breaks, in field order. Empty when the
  /// record may be stored.
  pub fn schema_violations(&self) -> Vec<String> {
    let mut v = Violations(Vec::new());

    v.required("name", &self.name);
    if self.branch.trim().is_empty() {
      v.required("branch", &self.branch);
    } else if Branch::from_str(self.branch.trim()).is_err() {
      v.0.push(format!("branch: {:?} is not a known branch", self.branch));
    }
    v.required("batch", &self.batch);
    if !(1..=8).contains(&self.semester) {
      v.0.push(format!("semester: {} is outside 1-8", self.semester));
    }
    v.required("specialization", &self.specialization);
    v.range("cgpa", self.cgpa, 0.0, 10.0);
    if let Some(prev) = self.previous_semester_cgpa {
      v.range("previousSemesterCgpa", prev, 0.0, 10.0);
    }

    v.required("contact.email", &self.contact.email);
    if !self.contact.email.is_empty() && !is_valid_email(&self.contact.email) {
      v.0.push(format!("contact.email: {:?} is not a valid email address", self.contact.email));
    }
    v.required("contact.phone", &self.contact.phone);

    for (i, a) in self.achievements.iter().enumerate() {
      v.required(&format!("achievements.{i}.title"), &a.title);
      v.required(&format!("achievements.{i}.description"), &a.description);
      v.url(&format!("achievements.{i}.certificate"), a.certificate.as_deref());
    }
    for (i, e) in self.experience.iter().enumerate() {
      v.required(&format!("experience.{i}.company"), &e.company);
      v.required(&format!("experience.{i}.role"), &e.role);
      v.required(&format!("experience.{i}.duration"), &e.duration);
      v.required(&format!("experience.{i}.description"), &e.description);
      v.url(&format!("experience.{i}.certificate"), e.certificate.as_deref());
    }
    for (i, p) in self.projects.iter().enumerate() {
      v.required(&format!("projects.{i}.title"), &p.title);
      v.required(&format!("projects.{i}.description"), &p.description);
      for (j, link) in p.links.iter().enumerate() {
        v.url(&format!("projects.{i}.links.{j}"), Some(link));
      }
      v.url(&format!("projects.{i}.githubUrl"), p.github_url.as_deref());
      v.url(&format!("projects.{i}.livePreview"), p.live_preview.as_deref());
    }
    for (i, c) in self.certifications.iter().enumerate() {
      v.required(&format!("certifications.{i}.name"), &c.name);
      v.required(&format!("certifications.{i}.issuer"), &c.issuer);
      v.url(&format!("certifications.{i}.certificate"), c.certificate.as_deref());
    }
    for (i, r) in self.research_publications.iter().enumerate() {
      v.required(&format!("researchPublications.{i}.title"), &r.title);
      v.url(&format!("researchPublications.{i}.paperUrl"), r.paper_url.as_deref());
    }

    v.url("socialLinks.github", self.social_links.github.as_deref());
    v.url("socialLinks.linkedin", self.social_links.linkedin.as_deref());
    v.url("socialLinks.portfolio", self.social_links.portfolio.as_deref());
    v.url("resumeUrl", self.resume_url.as_deref());
    v.url("profilePhoto", self.profile_photo.as_deref());

    for job in &self.preferences.job_type {
      if JobType::from_str(job.trim()).is_err() {
        v.0.push(format!("preferences.jobType: {job:?} is not a known job type"));
      }
    }

    v.0
  }

  /// `Ok(())` when [`Self::schema_violations`] is empty.
  pub fn check_schema(&self) -> Result<()> {
    let violations = self.schema_violations();
    if violations.is_empty() {
      Ok(())
    } else {
      Err(Error::SchemaViolation(violations))
    }
  }
}
