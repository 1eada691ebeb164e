//! Record validator: the import-time checks a candidate must pass before it
//! is handed to reconciliation.
//!
//! Every check runs and every failure is reported. The storage schema
//! applies its own, stricter checks on write.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::Candidate;

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?\d{1,16}$").expect("valid phone regex"));

static PHONE_NOISE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[\s\-()]").expect("valid phone noise regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
  pub errors: Vec<String>,
}

impl Verdict {
  pub fn is_valid(&self) -> bool { self.errors.is_empty() }
}

pub fn validate(candidate: &Candidate) -> Verdict {
  let r = &candidate.record;
  let mut errors = Vec::new();

  for (value, label) in [
    (&r.name, "Name"),
    (&r.branch, "Branch"),
    (&r.batch, "Batch"),
    (&r.specialization, "Specialization"),
    (&r.contact.email, "Email"),
  ] {
    if value.trim().is_empty() {
      errors.push(format!("{label} is required"));
    }
  }

  if candidate.defaulted.cgpa || !(0.0..=10.0).contains(&r.cgpa) {
    errors.push("Valid CGPA (0-10) is required".to_owned());
  }

  let email = r.contact.email.trim();
  if !email.is_empty() && !EMAIL_RE.is_match(email) {
    errors.push("Valid email address is required".to_owned());
  }

  let phone = r.contact.phone.trim();
  if !phone.is_empty() && !PHONE_RE.is_match(&PHONE_NOISE_RE.replace_all(phone, "")) {
    errors.push("Valid phone number is required".to_owned());
  }

  Verdict { errors }
}
