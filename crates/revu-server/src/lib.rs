//! HTTP server assembly for Revu.
//!
//! Mounts the JSON API under `/api`, the schema bootstrap route, and the
//! static front-end, then wraps everything in permissive CORS and request
//! tracing.

pub mod assets;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, extract::State, routing::get};
use revu_api::ApiError;
use revu_core::{secret::SecretAnswer, store::ReviewStore};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REVU_*` environment variables. Every key has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  /// Directory holding `index.html`, `style.css`, `script.js` and favicons.
  pub static_dir:    PathBuf,
  pub secret_answer: SecretAnswer,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "0.0.0.0".to_string(),
      port:          5000,
      store_path:    PathBuf::from("/data/reviews.db"),
      static_dir:    PathBuf::from("."),
      secret_answer: SecretAnswer::new("crispin"),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application [`Router`].
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: ReviewStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let admin = Router::new()
    .route("/init_db", get(init_db::<S>))
    .with_state(Arc::clone(&store));

  Router::new()
    .nest("/api", revu_api::api_router(store, config.secret_answer.clone()))
    .merge(admin)
    .merge(assets::router(config.static_dir.clone()))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

/// `GET /init_db`: create the tables if they are missing.
async fn init_db<S>(State(store): State<Arc<S>>) -> Result<&'static str, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.initialize().await.map_err(ApiError::store)?;
  tracing::info!("database schema initialised");
  Ok("Database initialized!")
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use std::path::Path;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use revu_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_app(static_dir: &Path) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let config = ServerConfig {
      static_dir: static_dir.to_path_buf(),
      ..ServerConfig::default()
    };
    router(Arc::new(store), &config)
  }

  /// A fresh directory under the system temp dir holding `files`, removed
  /// again on drop.
  struct StaticDir(PathBuf);

  impl StaticDir {
    fn new(tag: &str, files: &[(&str, &str)]) -> Self {
      let dir = std::env::temp_dir().join(format!("revu-{tag}-{}", std::process::id()));
      std::fs::create_dir_all(&dir).unwrap();
      for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
      }
      Self(dir)
    }
  }

  impl Drop for StaticDir {
    fn drop(&mut self) { let _ = std::fs::remove_dir_all(&self.0); }
  }

  async fn oneshot_raw(
    app:     &Router,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn json_call(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let resp = oneshot_raw(
      app,
      method,
      uri,
      vec![(header::CONTENT_TYPE, "application/json")],
      body,
    )
    .await;
    let status = resp.status();
    (status, serde_json::from_str(&body_text(resp).await).unwrap())
  }

  // ── End to end ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_review_list_and_search() {
    let dir = StaticDir::new("e2e", &[]);
    let app = make_app(&dir.0).await;

    let (status, subject) = json_call(&app, "POST", "/api/subjects", r#"{"name":"Rust"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(subject["id"], 1);

    let (status, review) = json_call(
      &app,
      "POST",
      "/api/subjects/1/reviews",
      r#"{"rating":5,"comment":"great","secret_answer":"crispin"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, reviews) = json_call(&app, "GET", "/api/subjects/1/reviews", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews, json!([review]));

    let (status, found) = json_call(&app, "GET", "/api/subjects?search=rust", "").await;
    assert_eq!(status, StatusCode::OK);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["name"], "Rust");
    assert_eq!(found[0]["average_rating"], 5.0);
  }

  // ── Admin ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn init_db_is_idempotent() {
    let dir = StaticDir::new("init", &[]);
    let app = make_app(&dir.0).await;
    json_call(&app, "POST", "/api/subjects", r#"{"name":"Kept"}"#).await;

    for _ in 0..2 {
      let resp = oneshot_raw(&app, "GET", "/init_db", vec![], "").await;
      assert_eq!(resp.status(), StatusCode::OK);
      assert_eq!(body_text(resp).await, "Database initialized!");
    }

    let (_, all) = json_call(&app, "GET", "/api/subjects", "").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
  }

  // ── CORS ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn any_origin_is_allowed() {
    let dir = StaticDir::new("cors", &[]);
    let app = make_app(&dir.0).await;
    let resp = oneshot_raw(
      &app,
      "GET",
      "/api/subjects",
      vec![(header::ORIGIN, "https://elsewhere.example")],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let allow = resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
      .unwrap()
      .to_str()
      .unwrap();
    assert_eq!(allow, "*");
  }

  // ── Static assets ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn index_and_allow_listed_assets_are_served() {
    let dir = StaticDir::new(
      "assets",
      &[
        ("index.html", "<h1>reviews</h1>"),
        ("style.css", "body {}"),
        ("favicon.ico", "icon"),
        ("secret.txt", "nope"),
      ],
    );
    let app = make_app(&dir.0).await;

    let resp = oneshot_raw(&app, "GET", "/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "<h1>reviews</h1>");

    let resp = oneshot_raw(&app, "GET", "/style.css", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.contains("css"), "Content-Type: {ct}");

    let resp = oneshot_raw(&app, "GET", "/favicon.ico", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = oneshot_raw(&app, "GET", "/secret.txt", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "File not found");
  }

  #[tokio::test]
  async fn allow_listed_but_missing_asset_is_404() {
    let dir = StaticDir::new("missing", &[]);
    let app = make_app(&dir.0).await;
    let resp = oneshot_raw(&app, "GET", "/script.js", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
