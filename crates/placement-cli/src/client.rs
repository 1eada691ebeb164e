//! Async HTTP client for a running placement server.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use placement_core::import::ImportBatchResult;
use reqwest::{
  Client,
  multipart::{Form, Part},
};
use serde::Deserialize;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Connection settings for the placement API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// The server's JSON envelope, success or failure.
#[derive(Debug, Deserialize)]
struct Reply<T> {
  success: bool,
  #[serde(default)]
  message: Option<String>,
  #[serde(default)]
  data:    Option<T>,
  #[serde(default)]
  error:   Option<String>,
}

pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    // Imports of large sheets can take a while server-side.
    let client = Client::builder()
      .timeout(Duration::from_secs(300))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// `POST /api/admin/import/excel`
  pub async fn upload_spreadsheet(
    &self,
    path: &Path,
    clear_existing: bool,
  ) -> Result<ImportBatchResult> {
    let bytes = tokio::fs::read(path)
      .await
      .with_context(|| format!("reading {}", path.display()))?;
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "students.xlsx".to_string());

    let part = Part::bytes(bytes)
      .file_name(file_name)
      .mime_str(XLSX_MIME)
      .context("building upload part")?;
    let form = Form::new()
      .text("clearExisting", clear_existing.to_string())
      .part("file", part);

    let resp = self
      .auth(self.client.post(self.url("/admin/import/excel")))
      .multipart(form)
      .send()
      .await
      .context("POST /admin/import/excel failed")?;

    let status = resp.status();
    let reply: Reply<ImportBatchResult> = resp
      .json()
      .await
      .with_context(|| format!("decoding server response ({status})"))?;
    unwrap_reply(status, reply)
  }
}

fn unwrap_reply<T>(status: reqwest::StatusCode, reply: Reply<T>) -> Result<T> {
  if !reply.success {
    let error = reply.error.unwrap_or_else(|| "unknown error".to_string());
    return Err(anyhow!("server rejected the upload ({status}): {error}"));
  }
  if let Some(message) = &reply.message {
    tracing::info!(%message, "server replied");
  }
  reply
    .data
    .ok_or_else(|| anyhow!("server reply ({status}) carried no data"))
}
