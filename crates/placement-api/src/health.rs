//! `GET /health`: liveness plus a store round-trip.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::Utc;
use placement_core::store::StudentStore;
use serde_json::json;

use crate::ApiState;

pub async fn handler<S>(State(state): State<ApiState<S>>) -> Response
where
  S: StudentStore + 'static,
{
  match state.store.count().await {
    Ok(students) => Json(json!({
      "success": true,
      "message": "Server is healthy",
      "data": {
        "timestamp": Utc::now(),
        "database": "connected",
        "stats": { "students": students },
        "version": env!("CARGO_PKG_VERSION"),
      },
    }))
    .into_response(),
    Err(e) => {
      tracing::error!(error = %e, "health check failed");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
          "success": false,
          "error": "Database connection failed",
          "timestamp": Utc::now(),
        })),
      )
        .into_response()
    }
  }
}
