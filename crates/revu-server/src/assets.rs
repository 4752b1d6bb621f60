//! Static front-end assets.
//!
//! Only the page itself and a short allow-list of siblings are served from
//! the static directory; every other path is a plain-text 404.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::{Path, Request, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
};
use tower::ServiceExt as _;
use tower_http::services::ServeFile;

/// Router serving `index.html` at `/` and allow-listed files at `/{file}`.
pub fn router(dir: PathBuf) -> Router {
  Router::new()
    .route_service("/", ServeFile::new(dir.join("index.html")))
    .route("/{file}", get(asset))
    .with_state(Arc::new(dir))
}

/// `style.css`, `script.js`, and any `favicon.*`. Names with path
/// separators never match, even after percent-decoding, so `file` is always
/// a single path component.
pub fn is_public(file: &str) -> bool {
  if file.contains(['/', '\\']) || file == ".." {
    return false;
  }
  matches!(file, "style.css" | "script.js") || file.starts_with("favicon.")
}

async fn asset(
  State(dir): State<Arc<PathBuf>>,
  Path(file): Path<String>,
  req: Request,
) -> Response {
  if !is_public(&file) {
    return (StatusCode::NOT_FOUND, "File not found").into_response();
  }
  match ServeFile::new(dir.join(&file)).oneshot(req).await {
    Ok(res) => res.into_response(),
    Err(never) => match never {},
  }
}
