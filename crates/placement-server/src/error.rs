//! Authentication failures and their `IntoResponse` rendering.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Authentication required")]
  MissingCredentials,
  #[error("Invalid credentials")]
  InvalidCredentials,
  #[error("Access code has expired")]
  AccessExpired,
  #[error("Admin access required")]
  AdminOnly,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match self {
      Error::AdminOnly => StatusCode::FORBIDDEN,
      _ => StatusCode::UNAUTHORIZED,
    };
    let mut res = (
      status,
      Json(json!({ "success": false, "error": self.to_string() })),
    )
      .into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"placement\""),
      );
    }
    res
  }
}
