//! Handlers for `/subjects/{id}/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/subjects/{id}/reviews` | Newest first; 404 if the subject is unknown |
//! | `POST` | `/subjects/{id}/reviews` | Body: `{"rating":5,"comment":"...","secret_answer":"..."}` |
//!
//! The subject must exist before the body is even looked at, so an unknown
//! subject is always a 404 whatever else is wrong with the request.

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use revu_core::{
  review::{Review, ReviewSubmission},
  store::ReviewStore,
};

use crate::{ApiState, error::ApiError};

/// Parse the `{id}` path segment. Anything that is not an integer cannot
/// name a subject, so it is a 404 rather than a 400.
fn parse_subject_id(raw: &str) -> Result<i64, ApiError> {
  raw.parse().map_err(|_| not_found())
}

fn not_found() -> ApiError { ApiError::NotFound("Subject not found".to_owned()) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /subjects/{id}/reviews`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subject_id = parse_subject_id(&id)?;
  let reviews = state
    .store
    .list_reviews(subject_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  Ok(Json(reviews))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /subjects/{id}/reviews`: returns 201 + the stored [`Review`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subject_id = parse_subject_id(&id)?;
  state
    .store
    .get_subject(subject_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;

  let input = ReviewSubmission::from_body(&body)?
    .validate(subject_id, &state.secret)
    .inspect_err(|e| {
      if e.is_auth() {
        tracing::warn!(subject_id, "review rejected: incorrect secret answer");
      }
    })?;

  // The subject can vanish between the check above and the insert.
  let review = state
    .store
    .add_review(input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;

  tracing::info!(subject_id, review_id = review.id, rating = review.rating.get(), "review added");
  Ok((StatusCode::CREATED, Json(review)))
}
