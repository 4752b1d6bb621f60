//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use revu_core::subject::SubjectSummary;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"error": "<message>"}`; `Conflict` also
/// carries the subject that already holds the name.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("conflict: {message}")]
  Conflict {
    message: String,
    subject: Box<SubjectSummary>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    tracing::error!(error = %e, "store failure");
    Self::Store(Box::new(e))
  }
}

impl From<revu_core::Error> for ApiError {
  fn from(e: revu_core::Error) -> Self {
    if e.is_auth() {
      Self::Forbidden(e.to_string())
    } else {
      Self::BadRequest(e.to_string())
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, Json(json!({ "error": m }))),
      ApiError::Conflict { message, subject } => (
        StatusCode::CONFLICT,
        Json(json!({ "error": message, "subject": subject })),
      ),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      ),
    }
    .into_response()
  }
}
