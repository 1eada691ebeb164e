//! Router-level tests against an in-memory store.

use std::sync::Arc;

use axum::{
  Extension, Router,
  body::{Body, to_bytes},
  http::{Method, Request, StatusCode, header},
};
use placement_core::store::StudentStore;
use placement_import::{SheetOptions, decode_workbook, template_workbook};
use placement_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{ApiState, Principal, admin_router, public_router, recruiter_router};

async fn app() -> (Router, Arc<SqliteStore>) {
  let store = Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"));
  let state = ApiState::new(store.clone());
  let router = recruiter_router(state.clone())
    .merge(admin_router(state.clone()))
    .merge(public_router(state))
    .layer(Extension(Principal::Recruiter { company: "Acme Corp".into() }));
  (router, store)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, body)
}

fn get(uri: &str) -> Request<Body> { Request::get(uri).body(Body::empty()).unwrap() }

fn json_req(method: Method, uri: &str, body: &Value) -> Request<Body> {
  Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn student(name: &str, email: &str, cgpa: f64) -> Value {
  json!({
    "name": name,
    "branch": "AI/ML",
    "batch": "2022-26",
    "semester": 7,
    "specialization": "Machine Learning",
    "cgpa": cgpa,
    "contact": { "email": email, "phone": "+91 9123456789" },
    "skills": ["Python", "PyTorch"],
  })
}

async fn create(app: &Router, body: Value) -> String {
  let (status, resp) = send(app, json_req(Method::POST, "/admin/students", &body)).await;
  assert_eq!(status, StatusCode::CREATED, "{resp}");
  resp["data"]["id"].as_str().unwrap().to_owned()
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_student_count() {
  let (app, _) = app().await;
  create(&app, student("A", "a@x.com", 8.0)).await;

  let (status, body) = send(&app, get("/health")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["stats"]["students"], 1);
}

// ─── Admin CRUD ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get() {
  let (app, _) = app().await;
  let id = create(&app, student("Aarav", "aarav@x.com", 9.1)).await;

  let (status, body) = send(&app, get(&format!("/students/{id}"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["name"], "Aarav");
  assert_eq!(body["data"]["contact"]["email"], "aarav@x.com");
  assert_eq!(body["data"]["languagesKnown"], json!(["English"]));
}

#[tokio::test]
async fn get_rejects_bad_and_unknown_ids() {
  let (app, _) = app().await;

  let (status, body) = send(&app, get("/students/not-a-uuid")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({ "success": false, "error": "Invalid student ID format" }));

  let (status, body) = send(&app, get(&format!("/students/{}", Uuid::new_v4()))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Student not found");
}

#[tokio::test]
async fn create_names_the_missing_field() {
  let (app, store) = app().await;
  let mut body = student("A", "a@x.com", 8.0);
  body.as_object_mut().unwrap().remove("contact");

  let (status, resp) = send(&app, json_req(Method::POST, "/admin/students", &body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["error"], "Missing required field: contact");
  assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn create_reports_schema_violations() {
  let (app, _) = app().await;
  let mut body = student("A", "a@x.com", 8.0);
  body["branch"] = json!("Mechanical");

  let (status, resp) = send(&app, json_req(Method::POST, "/admin/students", &body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let error = resp["error"].as_str().unwrap();
  assert!(error.contains("not a known branch"), "{error}");
}

#[tokio::test]
async fn update_merges_top_level_fields() {
  let (app, _) = app().await;
  let id = create(&app, student("Aarav", "aarav@x.com", 9.1)).await;

  let patch = json!({ "cgpa": 9.4, "tags": ["Topper"], "id": "ignored" });
  let (status, body) =
    send(&app, json_req(Method::PUT, &format!("/admin/students/{id}"), &patch)).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "Student updated successfully");
  assert_eq!(body["data"]["id"], id.as_str());
  assert_eq!(body["data"]["cgpa"], 9.4);
  assert_eq!(body["data"]["tags"], json!(["Topper"]));
  assert_eq!(body["data"]["skills"], json!(["Python", "PyTorch"]));
}

#[tokio::test]
async fn update_validates_and_404s() {
  let (app, _) = app().await;
  let id = create(&app, student("Aarav", "aarav@x.com", 9.1)).await;

  let (status, _) = send(
    &app,
    json_req(Method::PUT, &format!("/admin/students/{id}"), &json!({ "semester": 12 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    json_req(
      Method::PUT,
      &format!("/admin/students/{}", Uuid::new_v4()),
      &json!({ "cgpa": 5.0 }),
    ),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_404() {
  let (app, store) = app().await;
  let id = create(&app, student("A", "a@x.com", 8.0)).await;

  let del = || {
    Request::delete(format!("/admin/students/{id}"))
      .body(Body::empty())
      .unwrap()
  };
  let (status, body) = send(&app, del()).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Student deleted successfully");
  assert_eq!(store.count().await.unwrap(), 0);

  let (status, _) = send(&app, del()).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Directory ───────────────────────────────────────────────────────────────

async fn seed(app: &Router) {
  create(app, student("Charu", "c@x.com", 7.5)).await;
  create(app, student("Aarav", "a@x.com", 9.1)).await;
  let mut b = student("Bela", "b@x.com", 8.6);
  b["tags"] = json!(["Research"]);
  create(app, b).await;
}

#[tokio::test]
async fn list_paginates_with_metadata() {
  let (app, _) = app().await;
  seed(&app).await;

  let (status, body) =
    send(&app, get("/students?page=2&limit=2&sortBy=name&sortOrder=asc")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(body["data"][0]["name"], "Charu");
  assert_eq!(body["pagination"], json!({
    "currentPage": 2,
    "totalPages": 2,
    "totalStudents": 3,
    "limit": 2,
    "hasNextPage": false,
    "hasPrevPage": true,
  }));
  assert_eq!(body["filters"], json!({ "applied": false, "count": 0 }));
}

#[tokio::test]
async fn list_past_the_last_page_is_empty() {
  let (app, _) = app().await;
  seed(&app).await;

  let (status, body) = send(&app, get(&format!("/students?page={}", usize::MAX))).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["data"], json!([]));
  assert_eq!(body["pagination"]["totalStudents"], 3);
  assert_eq!(body["pagination"]["hasNextPage"], false);
}

#[tokio::test]
async fn list_defaults_to_cgpa_desc_and_caps_limit() {
  let (app, _) = app().await;
  seed(&app).await;

  let (_, body) = send(&app, get("/students?limit=500")).await;
  assert_eq!(body["pagination"]["limit"], 50);
  let names: Vec<&str> = body["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["name"].as_str().unwrap())
    .collect();
  assert_eq!(names, ["Aarav", "Bela", "Charu"]);
}

#[tokio::test]
async fn list_applies_filters() {
  let (app, _) = app().await;
  seed(&app).await;

  let (_, body) = send(&app, get("/students?cgpa_gte=8&tags=Research,Other")).await;
  assert_eq!(body["pagination"]["totalStudents"], 1);
  assert_eq!(body["data"][0]["name"], "Bela");
  assert_eq!(body["filters"], json!({ "applied": true, "count": 2 }));

  let (_, body) = send(&app, get("/students?specialization=machine&semester=7")).await;
  assert_eq!(body["pagination"]["totalStudents"], 3);
}

#[tokio::test]
async fn search_requires_a_query() {
  let (app, _) = app().await;
  seed(&app).await;

  let (status, body) = send(&app, get("/students/search?q=%20")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Search query is required");

  let (status, body) = send(&app, get("/students/search?name=bel")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 1);
  assert_eq!(body["query"], "bel");
  assert_eq!(body["data"][0]["name"], "Bela");
}

#[tokio::test]
async fn resume_link_names_the_recruiter() {
  let (app, _) = app().await;
  let without = create(&app, student("A", "a@x.com", 8.0)).await;
  let mut with = student("B", "b@x.com", 8.0);
  with["resumeUrl"] = json!("https://drive.google.com/file/d/b/view");
  let with = create(&app, with).await;

  let (status, body) = send(&app, get(&format!("/students/{without}/resume"))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Resume not available for this student");

  let (status, body) = send(&app, get(&format!("/students/{with}/resume"))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["data"]["resumeUrl"], "https://drive.google.com/file/d/b/view");
  assert_eq!(body["data"]["studentName"], "B");
  assert_eq!(body["data"]["downloadedBy"], "Acme Corp");
}

// ─── Import ──────────────────────────────────────────────────────────────────

fn flat_row(name: &str, email: &str, cgpa: Value) -> Value {
  json!({
    "name": name,
    "branch": "CSE",
    "batch": "2022-26",
    "semester": 5,
    "specialization": "Systems",
    "cgpa": cgpa,
    "email": email,
    "phone": "9123456789",
    "skills": ["Rust", "Go"],
  })
}

#[tokio::test]
async fn bulk_import_reports_per_row_outcomes() {
  let (app, store) = app().await;
  create(&app, student("Old", "old@x.com", 8.0)).await;

  let body = json!({
    "students": [
      flat_row("A", "a@x.com", json!(8.5)),
      flat_row("B", "b@x.com", json!("abc")),
    ],
    "clearExisting": true,
  });
  let (status, resp) = send(&app, json_req(Method::PUT, "/admin/students", &body)).await;
  assert_eq!(status, StatusCode::OK, "{resp}");
  assert_eq!(resp["message"], "Bulk import completed");
  assert_eq!(resp["data"]["total"], 2);
  assert_eq!(resp["data"]["created"], 1);
  assert_eq!(resp["data"]["skipped"], 1);
  assert_eq!(resp["data"]["errors"][0]["row"], 2);
  assert!(resp["data"].get("dryRun").is_none());
  assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn bulk_import_accepts_fetched_documents() {
  let (app, store) = app().await;
  let mut body = student("Aarav", "aarav@x.com", 8.0);
  body["experience"] = json!([{
    "company": "Startup X",
    "role": "Web Dev Intern",
    "duration": "Jun 2024 - Aug 2024",
    "description": "Checkout UI",
  }]);
  body["socialLinks"] = json!({ "github": "https://github.com/aarav" });
  let id = create(&app, body).await;

  let (_, fetched) = send(&app, get(&format!("/students/{id}"))).await;
  let mut doc = fetched["data"].clone();
  doc["cgpa"] = json!(9.4);

  let payload = json!({ "students": [doc] });
  let (status, resp) = send(&app, json_req(Method::PUT, "/admin/students", &payload)).await;
  assert_eq!(status, StatusCode::OK, "{resp}");
  assert_eq!(resp["data"]["updated"], 1, "{resp}");
  assert_eq!(resp["data"]["skipped"], 0);
  assert_eq!(store.count().await.unwrap(), 1);

  let (_, after) = send(&app, get(&format!("/students/{id}"))).await;
  let after = &after["data"];
  assert_eq!(after["cgpa"], 9.4);
  assert_eq!(after["contact"]["phone"], "+91 9123456789");
  assert_eq!(after["experience"][0]["company"], "Startup X");
  assert_eq!(after["socialLinks"]["github"], "https://github.com/aarav");
  assert_eq!(after["skills"], json!(["Python", "PyTorch"]));
}

#[tokio::test]
async fn bulk_import_rejects_empty_array() {
  let (app, _) = app().await;
  let (status, resp) =
    send(&app, json_req(Method::PUT, "/admin/students", &json!({ "students": [] }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["error"], "Invalid students array");
}

const BOUNDARY: &str = "placement-test-boundary";

fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
  let mut body = Vec::new();
  for (name, file_name, data) in parts {
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match file_name {
      Some(file) => body.extend_from_slice(
        format!(
          "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file}\"\r\n\
           Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
      ),
      None => body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
      ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

  Request::post("/admin/import/excel")
    .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
    .body(Body::from(body))
    .unwrap()
}

#[tokio::test]
async fn excel_upload_imports_the_template() {
  let (app, store) = app().await;
  let bytes = template_workbook().unwrap();

  let req = multipart(&[("clearExisting", None, b"true"), ("file", Some("students.xlsx"), &bytes)]);
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK, "{body}");
  assert_eq!(body["message"], "Excel import completed");
  assert_eq!(body["data"]["created"], 2, "{body}");
  assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn excel_upload_rejections() {
  let (app, _) = app().await;

  let (status, body) = send(&app, multipart(&[("clearExisting", None, b"false")])).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "No file uploaded");

  let (status, body) = send(&app, multipart(&[("file", Some("students.csv"), b"a,b\n1,2")])).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Please upload an Excel file (.xlsx or .xls)");

  let (status, _) = send(&app, multipart(&[("file", Some("broken.xlsx"), b"not a zip")])).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn template_download() {
  let (app, _) = app().await;
  let resp = app.clone().oneshot(get("/admin/import/template")).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers()[header::CONTENT_DISPOSITION],
    "attachment; filename=\"student_import_template.xlsx\""
  );

  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let sheet = decode_workbook(&bytes, &SheetOptions::default()).unwrap();
  assert_eq!(sheet.rows.len(), 2);
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_dashboard() {
  let (app, _) = app().await;
  seed(&app).await;

  let (status, body) = send(&app, get("/admin/stats")).await;
  assert_eq!(status, StatusCode::OK);
  let data = &body["data"];
  assert_eq!(data["overview"]["totalStudents"], 3);
  assert_eq!(data["overview"]["highCgpaStudents"], 2);
  assert_eq!(data["overview"]["averageCgpa"], 8.4);
  assert_eq!(data["distribution"]["byBranch"], json!([{ "_id": "AI/ML", "count": 3 }]));
  assert_eq!(data["recent"].as_array().unwrap().len(), 3);
  assert_eq!(data["recent"][0]["name"], "Bela");
}
