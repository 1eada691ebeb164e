//! Column header dialects.
//!
//! Each field lists the headers it may arrive under, highest priority first:
//! the Title Case spelling used by spreadsheets, then the camelCase spelling
//! used by scripts and the JSON bulk path, then (for nested fields) the
//! dotted path a flattened JSON document produces. Supporting another dialect
//! means appending to these lists.

pub type Aliases = &'static [&'static str];

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub const NAME: Aliases = &["Name", "name"];
pub const BRANCH: Aliases = &["Branch", "branch"];
pub const BATCH: Aliases = &["Batch", "batch"];
pub const SEMESTER: Aliases = &["Semester", "semester"];
pub const SPECIALIZATION: Aliases = &["Specialization", "specialization"];
pub const CGPA: Aliases = &["CGPA", "cgpa"];
pub const PREVIOUS_CGPA: Aliases = &["Previous Semester CGPA", "previousSemesterCgpa"];
pub const OVERVIEW: Aliases = &["Overview", "overview"];
pub const EMAIL: Aliases = &["Email", "email", "contact.email"];
pub const PHONE: Aliases = &["Phone", "phone", "contact.phone"];

// ─── Comma lists ─────────────────────────────────────────────────────────────

pub const SKILLS: Aliases = &["Skills", "skills"];
pub const TAGS: Aliases = &["Tags", "tags"];
pub const LANGUAGES: Aliases = &["Languages Known", "languagesKnown"];
pub const PREFERRED_LOCATIONS: Aliases =
  &["Preferred Locations", "preferredLocations", "preferences.location"];
pub const PREFERRED_JOB_TYPES: Aliases =
  &["Preferred Job Types", "preferredJobTypes", "preferences.jobType"];
pub const PREFERRED_ROLES: Aliases = &["Preferred Roles", "preferredRoles", "preferences.role"];
pub const PREFERRED_INDUSTRIES: Aliases =
  &["Preferred Industries", "preferredIndustries", "preferences.industries"];

// ─── Links ───────────────────────────────────────────────────────────────────

pub const RESUME_URL: Aliases = &["Resume URL", "resumeUrl"];
pub const PROFILE_PHOTO: Aliases = &["Profile Photo", "profilePhoto"];
pub const GITHUB: Aliases = &["GitHub", "github", "socialLinks.github"];
pub const LINKEDIN: Aliases = &["LinkedIn", "linkedin", "socialLinks.linkedin"];
pub const PORTFOLIO: Aliases = &["Portfolio", "portfolio", "socialLinks.portfolio"];

// ─── Multi-entry groups (pipe-separated) ─────────────────────────────────────
//
// The first column of each group is the primary column. A JSON document may
// instead carry the group as an array of objects under the primary column's
// camelCase name; see [`crate::multi`].

pub const ACHIEVEMENTS: [Aliases; 4] = [
  &["Achievements", "achievements"],
  &["Achievement Description", "achievementDescription"],
  &["Achievement Date", "achievementDate"],
  &["Achievement Certificate", "achievementCertificate"],
];

pub const EXPERIENCE: [Aliases; 5] = [
  &["Experience", "experience"],
  &["Experience Role", "experienceRole"],
  &["Experience Duration", "experienceDuration"],
  &["Experience Description", "experienceDescription"],
  &["Experience Certificate", "experienceCertificate"],
];

pub const PROJECTS: [Aliases; 6] = [
  &["Projects", "projects"],
  &["Project Description", "projectDescription"],
  &["Project Tech", "projectTech"],
  &["Project Links", "projectLinks"],
  &["Project GitHub", "projectGithub"],
  &["Project Live Preview", "projectLivePreview"],
];

pub const CERTIFICATIONS: [Aliases; 4] = [
  &["Certifications", "certifications"],
  &["Certification Issuer", "certificationIssuer"],
  &["Certification Year", "certificationYear"],
  &["Certification URL", "certificationUrl"],
];

pub const PUBLICATIONS: [Aliases; 5] = [
  &["Research Publications", "researchPublications"],
  &["Publication Journal", "publicationJournal"],
  &["Publication Year", "publicationYear"],
  &["Publication Authors", "publicationAuthors"],
  &["Publication URL", "publicationUrl"],
];

/// Header row of the downloadable template, in column order.
pub const TEMPLATE: &[&str] = &[
  "Name",
  "Branch",
  "Batch",
  "Semester",
  "Specialization",
  "CGPA",
  "Email",
  "Phone",
  "Skills",
  "Achievements",
  "Achievement Description",
  "Tags",
  "Resume URL",
  "Profile Photo",
  "Experience",
  "Experience Role",
  "Experience Duration",
  "Experience Description",
  "Projects",
  "Project Description",
  "Project Tech",
  "Project Links",
  "Certifications",
  "Certification Issuer",
  "Certification Year",
];
