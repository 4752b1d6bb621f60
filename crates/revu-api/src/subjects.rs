//! Handlers for `/subjects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects` | Optional `?search=<substring>`, case-insensitive |
//! | `POST` | `/subjects` | Body: `{"name":"..."}`; 409 + existing subject on duplicate |

use axum::{
  Json,
  body::Bytes,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use revu_core::{
  store::ReviewStore,
  subject::{SubjectCreation, SubjectQuery, SubjectSummary, normalize_name},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
}

/// `GET /subjects[?search=<text>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<SubjectSummary>>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = SubjectQuery { search: params.search };
  let subjects = state
    .store
    .search_subjects(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(subjects))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
  pub name: Option<String>,
}

/// `POST /subjects` with body `{"name":"Rust"}`
///
/// A body that is not a JSON object with a string `name` is treated as a
/// missing name.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let body: CreateBody = serde_json::from_slice(&body).unwrap_or_default();
  let name = normalize_name(body.name.as_deref())?;

  match state.store.create_subject(name).await.map_err(ApiError::store)? {
    SubjectCreation::Created(subject) => {
      tracing::info!(id = subject.subject.id, name = %subject.subject.name, "subject created");
      Ok((StatusCode::CREATED, Json(subject)))
    }
    SubjectCreation::Exists(subject) => Err(ApiError::Conflict {
      message: "Subject already exists".to_owned(),
      subject: Box::new(subject),
    }),
  }
}
