//! HTTP server for the placement portal.
//!
//! Wraps the [`placement_api`] routers with Basic authentication, a request
//! body limit and request tracing, and mounts everything under `/api`.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, extract::DefaultBodyLimit, middleware};
use placement_api::ApiState;
use placement_core::store::StudentStore;
use placement_import::ReconcileStrategy;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AdminCredentials, AuthConfig, RecruiterCredentials, require_admin, require_recruiter};

/// Spreadsheet uploads larger than this are rejected unless configured.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

fn default_max_upload_bytes() -> usize { DEFAULT_MAX_UPLOAD_BYTES }

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:   usize,
  #[serde(default)]
  pub reconcile_strategy: ReconcileStrategy,
  pub admin:              AdminCredentials,
  #[serde(default)]
  pub recruiters:         Vec<RecruiterCredentials>,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      admin:      self.admin.clone(),
      recruiters: self.recruiters.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: StudentStore + 'static,
{
  let state = ApiState { store, strategy: config.reconcile_strategy };
  let auth = Arc::new(config.auth());

  let recruiter = placement_api::recruiter_router(state.clone()).route_layer(
    middleware::from_fn_with_state(auth.clone(), require_recruiter),
  );
  let admin = placement_api::admin_router(state.clone())
    .route_layer(middleware::from_fn_with_state(auth, require_admin));
  let public = placement_api::public_router(state);

  Router::new()
    .nest("/api", recruiter.merge(admin).merge(public))
    .layer(DefaultBodyLimit::max(config.max_upload_bytes))
    .layer(TraceLayer::new_for_http())
}
