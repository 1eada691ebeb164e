//! Integration tests for `SqliteStore` against an in-memory database.

use placement_core::{
  store::{SortField, SortOrder, StudentQuery, StudentStore},
  student::{Contact, StudentRecord},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn student(name: &str, email: &str, cgpa: f64) -> StudentRecord {
  StudentRecord {
    name: name.into(),
    branch: "Computer Science & Engineering".into(),
    batch: "2022-26".into(),
    semester: 7,
    specialization: "AI/ML".into(),
    cgpa,
    contact: Contact { email: email.into(), phone: "+91 9123456789".into() },
    ..StudentRecord::default()
  }
}

fn page(limit: usize) -> StudentQuery {
  StudentQuery { limit, ..StudentQuery::default() }
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get() {
  let s = store().await;

  let created = s.create(student("Aarav", "aarav@x.com", 9.1)).await.unwrap();
  assert_eq!(created.created_at, created.updated_at);

  let fetched = s.get(created.id).await.unwrap().expect("stored");
  assert_eq!(fetched.id, created.id);
  assert_eq!(fetched.record, created.record);
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn create_rejects_schema_violations() {
  let s = store().await;
  let mut record = student("Priya", "priya@x.com", 8.7);
  record.branch = "Information Technology".into();

  let err = s.create(record).await.unwrap_err();
  assert!(err.to_string().starts_with("student validation failed: branch:"), "{err}");
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_emails_are_not_rejected_by_the_schema() {
  let s = store().await;
  s.create(student("A", "same@x.com", 8.0)).await.unwrap();
  s.create(student("B", "same@x.com", 8.0)).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 2);
}

// ─── Matching ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn find_match_by_email() {
  let s = store().await;
  let created = s.create(student("Aarav", "aarav@x.com", 9.1)).await.unwrap();

  let mut lookup = student("Someone Else", "aarav@x.com", 5.0);
  lookup.batch = "2019-23".into();
  let found = s.find_match(&lookup.dedup_key()).await.unwrap().expect("match");
  assert_eq!(found.id, created.id);
}

#[tokio::test]
async fn find_match_by_name_and_batch() {
  let s = store().await;
  let created = s.create(student("Aarav", "aarav@x.com", 9.1)).await.unwrap();

  let lookup = student("Aarav", "new-address@x.com", 9.1);
  let found = s.find_match(&lookup.dedup_key()).await.unwrap().expect("match");
  assert_eq!(found.id, created.id);

  let mut other_batch = lookup.clone();
  other_batch.batch = "2023-27".into();
  assert!(s.find_match(&other_batch.dedup_key()).await.unwrap().is_none());
}

#[tokio::test]
async fn find_match_returns_first_inserted() {
  let s = store().await;
  let first = s.create(student("A", "a@x.com", 8.0)).await.unwrap();
  s.create(student("B", "b@x.com", 8.0)).await.unwrap();

  // Email matches A, (name, batch) matches B: first stored wins.
  let lookup = student("B", "a@x.com", 8.0);
  let found = s.find_match(&lookup.dedup_key()).await.unwrap().unwrap();
  assert_eq!(found.id, first.id);
}

// ─── Update / delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_document_and_keeps_identity() {
  let s = store().await;
  let mut record = student("Aarav", "aarav@x.com", 9.1);
  record.skills = vec!["Python".into(), "Rust".into()];
  let created = s.create(record).await.unwrap();

  let replacement = student("Aarav", "aarav@x.com", 9.4);
  let updated = s
    .update_by_id(created.id, replacement.clone())
    .await
    .unwrap()
    .expect("exists");
  assert_eq!(updated.id, created.id);
  assert_eq!(updated.created_at, created.created_at);
  assert!(updated.updated_at >= created.updated_at);

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.record, replacement);
  assert!(fetched.record.skills.is_empty());
}

#[tokio::test]
async fn branch_aliases_are_stored_canonically() {
  let s = store().await;
  let mut record = student("Aarav", "aarav@x.com", 9.1);
  record.branch = "CSE".into();
  let created = s.create(record).await.unwrap();
  assert_eq!(created.record.branch, "Computer Science & Engineering");

  let mut replacement = student("Aarav", "aarav@x.com", 9.1);
  replacement.branch = "ds".into();
  s.update_by_id(created.id, replacement).await.unwrap().expect("exists");

  let fetched = s.get(created.id).await.unwrap().unwrap();
  assert_eq!(fetched.record.branch, "Data Science");
  let query = StudentQuery { branch: Some("Data".into()), ..page(10) };
  assert_eq!(s.list(&query).await.unwrap().total, 1);
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let result = s
    .update_by_id(Uuid::new_v4(), student("A", "a@x.com", 8.0))
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn update_rejects_schema_violations() {
  let s = store().await;
  let created = s.create(student("A", "a@x.com", 8.0)).await.unwrap();
  let mut bad = student("A", "a@x.com", 8.0);
  bad.semester = 0;
  assert!(s.update_by_id(created.id, bad).await.is_err());
  assert_eq!(s.get(created.id).await.unwrap().unwrap().record.semester, 7);
}

#[tokio::test]
async fn delete_by_id_and_delete_all() {
  let s = store().await;
  let a = s.create(student("A", "a@x.com", 8.0)).await.unwrap();
  s.create(student("B", "b@x.com", 8.0)).await.unwrap();
  s.create(student("C", "c@x.com", 8.0)).await.unwrap();

  assert!(s.delete_by_id(a.id).await.unwrap());
  assert!(!s.delete_by_id(a.id).await.unwrap());
  assert_eq!(s.count().await.unwrap(), 2);

  assert_eq!(s.delete_all().await.unwrap(), 2);
  assert_eq!(s.count().await.unwrap(), 0);
}

// ─── List ────────────────────────────────────────────────────────────────────

async fn seeded() -> SqliteStore {
  let s = store().await;

  let mut a = student("Aarav", "aarav@x.com", 9.1);
  a.tags = vec!["AI/ML".into(), "High CGPA".into()];
  a.skills = vec!["Python".into(), "TensorFlow".into()];
  s.create(a).await.unwrap();

  let mut b = student("Priya", "priya@x.com", 8.7);
  b.branch = "Cyber Security".into();
  b.specialization = "Cybersecurity".into();
  b.batch = "2021-25".into();
  b.semester = 8;
  b.tags = vec!["Research".into()];
  b.skills = vec!["Networking".into(), "Python".into()];
  s.create(b).await.unwrap();

  let mut c = student("Rohan", "rohan@x.com", 7.2);
  c.branch = "Data Science".into();
  c.specialization = "Data Engineering".into();
  c.skills = vec!["SQL".into()];
  c.overview = "Enjoys building streaming pipelines".into();
  s.create(c).await.unwrap();

  s
}

#[tokio::test]
async fn list_defaults_to_cgpa_desc() {
  let s = seeded().await;
  let page = s.list(&page(10)).await.unwrap();
  assert_eq!(page.total, 3);
  let names: Vec<_> = page.students.iter().map(|st| st.record.name.as_str()).collect();
  assert_eq!(names, ["Aarav", "Priya", "Rohan"]);
}

#[tokio::test]
async fn list_paginates_and_counts_total() {
  let s = seeded().await;
  let query = StudentQuery {
    sort_by: SortField::Name,
    sort_order: SortOrder::Asc,
    limit: 2,
    offset: 2,
    ..StudentQuery::default()
  };
  let page = s.list(&query).await.unwrap();
  assert_eq!(page.total, 3);
  assert_eq!(page.students.len(), 1);
  assert_eq!(page.students[0].record.name, "Rohan");
}

#[tokio::test]
async fn list_offset_past_the_end_is_empty() {
  let s = seeded().await;
  let query = StudentQuery { offset: usize::MAX, ..page(usize::MAX) };
  let page = s.list(&query).await.unwrap();
  assert_eq!(page.total, 3);
  assert!(page.students.is_empty());
}

#[tokio::test]
async fn list_filters_by_cgpa_range_and_branch() {
  let s = seeded().await;
  let query = StudentQuery { cgpa_gte: Some(8.0), ..page(10) };
  assert_eq!(s.list(&query).await.unwrap().total, 2);

  let query = StudentQuery { cgpa_gte: Some(7.0), cgpa_lte: Some(8.8), ..page(10) };
  assert_eq!(s.list(&query).await.unwrap().total, 2);

  let query = StudentQuery { branch: Some("cyber".into()), ..page(10) };
  let result = s.list(&query).await.unwrap();
  assert_eq!(result.total, 1);
  assert_eq!(result.students[0].record.name, "Priya");
}

#[tokio::test]
async fn list_filters_by_tags_and_skills_any_of() {
  let s = seeded().await;

  let query = StudentQuery { tags: vec!["Research".into(), "High CGPA".into()], ..page(10) };
  assert_eq!(s.list(&query).await.unwrap().total, 2);

  let query = StudentQuery { skills: vec!["Python".into()], ..page(10) };
  assert_eq!(s.list(&query).await.unwrap().total, 2);

  let query = StudentQuery {
    skills: vec!["Python".into()],
    batch: Some("2021-25".into()),
    semester: Some(8),
    ..page(10)
  };
  let result = s.list(&query).await.unwrap();
  assert_eq!(result.total, 1);
  assert_eq!(result.students[0].record.name, "Priya");
}

// ─── Search / stats ──────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_name_skills_and_overview() {
  let s = seeded().await;

  let by_name = s.search("pri", 10).await.unwrap();
  assert_eq!(by_name.len(), 1);
  assert_eq!(by_name[0].record.name, "Priya");

  let by_skill = s.search("python", 10).await.unwrap();
  let names: Vec<_> = by_skill.iter().map(|st| st.record.name.as_str()).collect();
  assert_eq!(names, ["Aarav", "Priya"]);

  let by_overview = s.search("streaming", 10).await.unwrap();
  assert_eq!(by_overview.len(), 1);

  assert_eq!(s.search("python", 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn stats_aggregate_the_directory() {
  let s = seeded().await;
  let stats = s.stats().await.unwrap();

  assert_eq!(stats.total_students, 3);
  assert_eq!(stats.high_cgpa_students, 2);
  let avg = stats.average_cgpa.unwrap();
  assert!((avg - 25.0 / 3.0).abs() < 1e-9, "{avg}");
  assert_eq!(stats.by_branch.len(), 3);
  assert!(stats.by_branch.iter().all(|b| b.count == 1));
  assert_eq!(stats.recent.len(), 3);
}

#[tokio::test]
async fn stats_on_empty_store() {
  let s = store().await;
  let stats = s.stats().await.unwrap();
  assert_eq!(stats.total_students, 0);
  assert!(stats.average_cgpa.is_none());
  assert!(stats.recent.is_empty());
}
