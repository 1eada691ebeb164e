//! JSON REST API for the placement portal.
//!
//! Exposes axum [`Router`]s backed by any
//! [`placement_core::store::StudentStore`]. Authentication is the caller's
//! responsibility: the server binary checks credentials and inserts a
//! [`Principal`] request extension before these handlers run.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new().nest(
//!   "/api",
//!   placement_api::recruiter_router(state.clone())
//!     .merge(placement_api::admin_router(state.clone()))
//!     .merge(placement_api::public_router(state)),
//! )
//! ```

pub mod admin;
pub mod envelope;
pub mod error;
pub mod health;
pub mod import;
pub mod stats;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use placement_core::store::StudentStore;
use placement_import::ReconcileStrategy;

pub use envelope::Envelope;
pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  /// How the bulk and spreadsheet import endpoints write rows.
  pub strategy: ReconcileStrategy,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, strategy: ReconcileStrategy::default() }
  }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), strategy: self.strategy }
  }
}

// ─── Principal ───────────────────────────────────────────────────────────────

/// Who made the request. Inserted as a request extension by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
  Admin { username: String },
  Recruiter { company: String },
}

impl Principal {
  pub fn display_name(&self) -> &str {
    match self {
      Principal::Admin { username } => username,
      Principal::Recruiter { company } => company,
    }
  }
}

// ─── Routers ─────────────────────────────────────────────────────────────────

/// Read-only directory routes for recruiters (and admins).
pub fn recruiter_router<S>(state: ApiState<S>) -> Router<()>
where
  S: StudentStore + 'static,
{
  Router::new()
    .route("/students", get(students::list::<S>))
    .route("/students/search", get(students::search::<S>))
    .route("/students/{id}", get(students::get_one::<S>))
    .route("/students/{id}/resume", get(students::resume::<S>))
    .with_state(state)
}

/// Student management, import and dashboard routes.
pub fn admin_router<S>(state: ApiState<S>) -> Router<()>
where
  S: StudentStore + 'static,
{
  Router::new()
    // Students
    .route("/admin/students", post(admin::create::<S>).put(admin::bulk::<S>))
    .route(
      "/admin/students/{id}",
      put(admin::update::<S>).delete(admin::delete_one::<S>),
    )
    // Import
    .route("/admin/import/excel", post(import::excel::<S>))
    .route("/admin/import/template", get(import::template))
    // Dashboard
    .route("/admin/stats", get(stats::handler::<S>))
    .with_state(state)
}

/// Routes that need no credentials.
pub fn public_router<S>(state: ApiState<S>) -> Router<()>
where
  S: StudentStore + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
