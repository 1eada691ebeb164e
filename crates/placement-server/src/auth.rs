//! HTTP Basic authentication for the two portal roles.
//!
//! Admins log in with a configured username and password. Recruiters log in
//! with a per-company access code as the Basic password; the username part
//! is not checked. Both passwords are stored as argon2 PHC strings.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, Utc};
use placement_api::Principal;
use serde::Deserialize;

use crate::error::Error;

/// The admin account.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// One recruiting company's access grant.
#[derive(Debug, Clone, Deserialize)]
pub struct RecruiterCredentials {
  pub company:          String,
  pub access_code_hash: String,
  pub valid_till:       DateTime<Utc>,
}

/// Everything needed to authenticate a request.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub admin:      AdminCredentials,
  pub recruiters: Vec<RecruiterCredentials>,
}

/// Which routes a request is trying to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Admin,
  Recruiter,
}

fn password_matches(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    tracing::warn!("configured password hash is not a valid PHC string");
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let value = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::MissingCredentials)?;

  let encoded = value
    .strip_prefix("Basic ")
    .ok_or(Error::MissingCredentials)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::InvalidCredentials)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::InvalidCredentials)?;

  let (username, password) = creds.split_once(':').ok_or(Error::InvalidCredentials)?;
  Ok((username.to_owned(), password.to_owned()))
}

/// Authenticate `headers` for a route requiring `role`.
///
/// Admin credentials satisfy either role. A recruiter access code that
/// matches an expired grant is reported as such rather than as a bad
/// password.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
  role: Role,
  now: DateTime<Utc>,
) -> Result<Principal, Error> {
  let (username, password) = basic_credentials(headers)?;

  if username == config.admin.username
    && password_matches(&password, &config.admin.password_hash)
  {
    return Ok(Principal::Admin { username });
  }

  let Some(grant) = config
    .recruiters
    .iter()
    .find(|r| password_matches(&password, &r.access_code_hash))
  else {
    return Err(Error::InvalidCredentials);
  };

  if grant.valid_till <= now {
    return Err(Error::AccessExpired);
  }
  if role == Role::Admin {
    return Err(Error::AdminOnly);
  }
  Ok(Principal::Recruiter { company: grant.company.clone() })
}

async fn authenticate(
  auth: &AuthConfig,
  role: Role,
  mut req: Request,
  next: Next,
) -> Result<Response, Error> {
  let principal = verify_auth(req.headers(), auth, role, Utc::now()).inspect_err(|e| {
    tracing::warn!(path = %req.uri().path(), error = %e, "authentication failed");
  })?;
  tracing::debug!(who = principal.display_name(), "authenticated");
  req.extensions_mut().insert(principal);
  Ok(next.run(req).await)
}

/// Middleware for the admin routes.
pub async fn require_admin(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  authenticate(&auth, Role::Admin, req, next).await
}

/// Middleware for the recruiter directory routes.
pub async fn require_recruiter(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  authenticate(&auth, Role::Recruiter, req, next).await
}
