//! JSON REST API for Revu.
//!
//! Exposes an axum [`Router`] backed by any [`revu_core::store::ReviewStore`].
//! CORS, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", revu_api::api_router(store.clone(), secret))
//! ```

pub mod error;
pub mod reviews;
pub mod subjects;

use std::sync::Arc;

use axum::{Router, routing::get};
use revu_core::{secret::SecretAnswer, store::ReviewStore};

pub use error::ApiError;

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  /// The answer reviewers must give; injected so tests and deployments can
  /// choose their own.
  pub secret: SecretAnswer,
}

// Manual impl: the derive would demand `S: Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      secret: self.secret.clone(),
    }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, secret: SecretAnswer) -> Router<()>
where
  S: ReviewStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/subjects", get(subjects::list::<S>).post(subjects::create::<S>))
    .route(
      "/subjects/{id}/reviews",
      get(reviews::list::<S>).post(reviews::create::<S>),
    )
    .with_state(ApiState { store, secret })
}

// ─── Router tests ─────────────────────────────────────────────────────────────
