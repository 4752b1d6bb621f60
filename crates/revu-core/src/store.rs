//! The `ReviewStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `revu-store-sqlite`).
//! Higher layers (`revu-api`, `revu-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  review::{NewReview, Review},
  subject::{SubjectCreation, SubjectQuery, SubjectSummary},
};

/// Abstraction over a Revu review store backend.
///
/// Subjects and reviews are create-once records. The only removal is
/// [`delete_subject`](ReviewStore::delete_subject), which takes the subject's
/// reviews with it.
///
/// `Self::Error` is reserved for infrastructure failures. Domain outcomes
/// (duplicate name, unknown subject) are part of each method's return type.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create the backing tables if they do not exist yet. Idempotent.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  /// Persist a subject named `name` unless one with that exact name exists.
  ///
  /// `name` is expected to be normalised already
  /// (see [`normalize_name`](crate::subject::normalize_name)).
  fn create_subject(
    &self,
    name: String,
  ) -> impl Future<Output = Result<SubjectCreation, Self::Error>> + Send + '_;

  /// Retrieve a subject and its average rating. `None` if not found.
  fn get_subject(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SubjectSummary>, Self::Error>> + Send + '_;

  /// Subjects matching `query`, ordered by name ascending.
  fn search_subjects<'a>(
    &'a self,
    query: &'a SubjectQuery,
  ) -> impl Future<Output = Result<Vec<SubjectSummary>, Self::Error>> + Send + 'a;

  /// Delete a subject and all of its reviews. Returns `false` if there was
  /// no such subject.
  fn delete_subject(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Persist a review. Returns `None` if `input.subject_id` does not exist.
  /// `id` and `created_at` are assigned by the store.
  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Option<Review>, Self::Error>> + Send + '_;

  /// All reviews of a subject, newest first. `None` if the subject does not
  /// exist.
  fn list_reviews(
    &self,
    subject_id: i64,
  ) -> impl Future<Output = Result<Option<Vec<Review>>, Self::Error>> + Send + '_;
}
