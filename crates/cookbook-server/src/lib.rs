//! HTTP front door for the Cookbook recipe catalog.
//!
//! Mounts the JSON API under `/api`, a liveness probe at `/health`, and
//! serves the front-end bundle for every other path. CORS is fully open, so
//! deploy only on trusted networks.

pub mod settings;

pub use settings::ServerConfig;

use std::{path::Path, sync::Arc};

use axum::{Router, routing::get};
use cookbook_api::{admin_router, api_router};
use cookbook_core::store::RecipeStore;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application [`Router`] for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: RecipeStore + 'static,
{
  let mut api = api_router(store.clone());
  if config.seed_endpoint {
    tracing::warn!("seed endpoint enabled at /api/admin/seed");
    api = api.merge(admin_router(store));
  }

  let app = Router::new()
    .route("/health", get(health))
    .nest("/api", api);

  with_static_fallback(app, &config.static_dir)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::very_permissive())
}

/// Serve `dir` for every unmatched path if it exists; a missing directory
/// only logs a warning.
fn with_static_fallback(app: Router, dir: &Path) -> Router {
  if dir.is_dir() {
    tracing::info!(dir = %dir.display(), "serving static assets");
    app.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
  } else {
    tracing::warn!(dir = %dir.display(), "static directory not found, skipping");
    app
  }
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use cookbook_core::{
    domain::{Domain, NewDomain},
    recipe::{NewNote, NewRecipe, Note, Recipe, RecipeUpdate},
    seed::SeedOutcome,
  };
  use cookbook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn test_config() -> ServerConfig {
    ServerConfig {
      static_dir: PathBuf::from("/nonexistent/cookbook-static"),
      ..ServerConfig::default()
    }
  }

  async fn make_app(config: &ServerConfig) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(Arc::new(store), config)
  }

  /// A backend whose every call fails, as if the database were unreachable.
  struct UnavailableStore;

  fn unavailable() -> std::io::Error { std::io::Error::other("database is locked") }

  impl RecipeStore for UnavailableStore {
    type Error = std::io::Error;

    async fn list_domains(&self) -> Result<Vec<Domain>, Self::Error> {
      Err(unavailable())
    }

    async fn create_domain(&self, _: NewDomain) -> Result<Domain, Self::Error> {
      Err(unavailable())
    }

    async fn list_recipes(&self, _: u32, _: u32) -> Result<Vec<Recipe>, Self::Error> {
      Err(unavailable())
    }

    async fn get_recipe(&self, _: i64) -> Result<Option<Recipe>, Self::Error> {
      Err(unavailable())
    }

    async fn create_recipe(&self, _: NewRecipe) -> Result<Recipe, Self::Error> {
      Err(unavailable())
    }

    async fn update_recipe(
      &self,
      _: i64,
      _: RecipeUpdate,
    ) -> Result<Option<Recipe>, Self::Error> {
      Err(unavailable())
    }

    async fn create_note(&self, _: i64, _: NewNote) -> Result<Note, Self::Error> {
      Err(unavailable())
    }

    async fn seed(&self) -> Result<SeedOutcome, Self::Error> { Err(unavailable()) }
  }

  async fn send_raw(
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

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    }
  }

  /// Send a JSON request and decode the JSON response.
  async fn send(
    app:    &Router,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let (headers, body) = match &body {
      Some(v) => (vec![(header::CONTENT_TYPE, "application/json")], v.to_string()),
      None => (vec![], String::new()),
    };
    let resp = send_raw(app, method, uri, headers, &body).await;
    let status = resp.status();
    (status, body_json(resp).await)
  }

  async fn create_recipe(app: &Router, title: &str, summary: &str) -> Value {
    let (status, recipe) = send(
      app,
      "POST",
      "/api/recipes",
      Some(json!({
        "domain_id": 1,
        "title": title,
        "sql_content": "SELECT 1",
        "summary": summary,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    recipe
  }

  // ── Health ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let app = make_app(&test_config()).await;
    let resp = send_raw(&app, "GET", "/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Domains ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_domain_returns_systems() {
    let app = make_app(&test_config()).await;

    let (status, domain) = send(
      &app,
      "POST",
      "/api/domains",
      Some(json!({
        "name": "Sales",
        "description": "Revenue",
        "systems": [{ "system_name": "Salesforce" }, { "system_name": "GA" }],
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let systems = domain["systems"].as_array().unwrap();
    assert_eq!(systems.len(), 2);
    assert!(systems.iter().all(|s| s["domain_id"] == domain["id"]));
    assert_eq!(domain["recipes"], json!([]));

    let (status, domains) = send(&app, "GET", "/api/domains", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(domains.as_array().unwrap().len(), 1);
    assert_eq!(domains[0]["systems"], domain["systems"]);
  }

  #[tokio::test]
  async fn create_domain_systems_default_to_empty() {
    let app = make_app(&test_config()).await;
    let (status, domain) = send(
      &app,
      "POST",
      "/api/domains",
      Some(json!({ "name": "HR", "description": "People" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(domain["systems"], json!([]));
  }

  #[tokio::test]
  async fn malformed_domain_body_is_rejected_before_store() {
    let app = make_app(&test_config()).await;

    let (status, err) =
      send(&app, "POST", "/api/domains", Some(json!({ "name": "Sales" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(err["error"].as_str().unwrap().contains("description"), "{err}");

    let resp = send_raw(
      &app,
      "POST",
      "/api/domains",
      vec![(header::CONTENT_TYPE, "application/json")],
      "{not json",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());

    let (_, domains) = send(&app, "GET", "/api/domains", None).await;
    assert_eq!(domains, json!([]));
  }

  // ── Recipes ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn created_recipe_is_listed() {
    let app = make_app(&test_config()).await;
    let created = create_recipe(&app, "A", "S").await;
    assert!(created["created_at"].is_string());
    assert_eq!(created["notes"], json!([]));

    let (status, recipes) = send(&app, "GET", "/api/recipes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recipes, json!([created]));
  }

  #[tokio::test]
  async fn create_recipe_with_wrong_type_is_rejected() {
    let app = make_app(&test_config()).await;
    let (status, err) = send(
      &app,
      "POST",
      "/api/recipes",
      Some(json!({
        "domain_id": "one",
        "title": "A",
        "sql_content": "SELECT 1",
        "summary": "S",
      })),
    )
    .await;
    assert!(status.is_client_error());
    assert!(err["error"].is_string());

    let (_, recipes) = send(&app, "GET", "/api/recipes", None).await;
    assert_eq!(recipes, json!([]));
  }

  #[tokio::test]
  async fn recipe_body_without_json_content_type_is_rejected() {
    let app = make_app(&test_config()).await;
    let body = json!({
      "domain_id": 1,
      "title": "A",
      "sql_content": "SELECT 1",
      "summary": "S",
    });

    let resp = send_raw(&app, "POST", "/api/recipes", vec![], &body.to_string()).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body_json(resp).await["error"].is_string());

    let (_, recipes) = send(&app, "GET", "/api/recipes", None).await;
    assert_eq!(recipes, json!([]));
  }

  #[tokio::test]
  async fn list_recipes_paginates() {
    let app = make_app(&test_config()).await;
    let first = create_recipe(&app, "first", "S").await;
    create_recipe(&app, "second", "S").await;

    let (_, page) = send(&app, "GET", "/api/recipes?skip=0&limit=1", None).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["id"], first["id"]);

    let (status, page) = send(&app, "GET", "/api/recipes?skip=2&limit=100", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));
  }

  #[tokio::test]
  async fn negative_skip_is_a_client_error() {
    let app = make_app(&test_config()).await;
    let (status, err) = send(&app, "GET", "/api/recipes?skip=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());
  }

  // ── Partial update ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn partial_update_applies_only_present_fields() {
    let app = make_app(&test_config()).await;
    let created = create_recipe(&app, "A", "S").await;
    let uri = format!("/api/recipes/{}", created["id"]);

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "summary": "T" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "A");
    assert_eq!(updated["summary"], "T");

    let (status, unchanged) = send(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged, updated);

    let (_, nulls) = send(&app, "PUT", &uri, Some(json!({ "title": null }))).await;
    assert_eq!(nulls["title"], "A");
  }

  #[tokio::test]
  async fn update_unknown_recipe_returns_404() {
    let app = make_app(&test_config()).await;

    let (status, err) =
      send(&app, "PUT", "/api/recipes/999", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err, json!({ "error": "Recipe not found" }));

    let (_, recipes) = send(&app, "GET", "/api/recipes", None).await;
    assert_eq!(recipes, json!([]));
  }

  #[tokio::test]
  async fn non_numeric_recipe_id_is_a_client_error() {
    let app = make_app(&test_config()).await;
    let (status, err) =
      send(&app, "PUT", "/api/recipes/abc", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err["error"].is_string());
  }

  // ── Notes ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn notes_are_attached_and_stored_verbatim() {
    let app = make_app(&test_config()).await;
    let created = create_recipe(&app, "A", "S").await;
    let uri = format!("/api/recipes/{}/notes", created["id"]);

    for note_type in ["caution", "not-a-known-type"] {
      let (status, note) = send(
        &app,
        "POST",
        &uri,
        Some(json!({
          "author_name": "analyst",
          "note_type": note_type,
          "content": "check cancellations",
        })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
      assert_eq!(note["recipe_id"], created["id"]);
      assert_eq!(note["note_type"], note_type);
      assert!(note["created_at"].is_string());
    }

    let (_, recipes) = send(&app, "GET", "/api/recipes", None).await;
    let notes = recipes[0]["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["note_type"], "caution");
    assert_eq!(notes[1]["note_type"], "not-a-known-type");
  }

  #[tokio::test]
  async fn note_on_unknown_recipe_succeeds() {
    let app = make_app(&test_config()).await;
    let (status, note) = send(
      &app,
      "POST",
      "/api/recipes/12345/notes",
      Some(json!({ "author_name": "a", "note_type": "memo", "content": "c" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["recipe_id"], 12345);
  }

  // ── Store failures ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn store_failure_is_a_json_500() {
    let app = router(Arc::new(UnavailableStore), &test_config());

    let (status, err) = send(&app, "GET", "/api/domains", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["error"].as_str().unwrap().contains("database is locked"), "{err}");

    let (status, err) =
      send(&app, "PUT", "/api/recipes/1", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err["error"].is_string());
  }

  // ── Seed endpoint ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn seed_endpoint_is_off_by_default() {
    let app = make_app(&test_config()).await;
    let resp = send_raw(&app, "GET", "/api/admin/seed", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn seed_endpoint_is_idempotent() {
    let config = ServerConfig { seed_endpoint: true, ..test_config() };
    let app = make_app(&config).await;

    let (status, first) = send(&app, "GET", "/api/admin/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["outcome"]["status"], "seeded");
    assert!(first["message"].is_string());

    let (_, domains_before) = send(&app, "GET", "/api/domains", None).await;

    let (status, second) = send(&app, "GET", "/api/admin/seed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["outcome"]["status"], "already_seeded");

    let (_, domains_after) = send(&app, "GET", "/api/domains", None).await;
    assert_eq!(domains_before, domains_after);
    assert_eq!(domains_after.as_array().unwrap().len(), 2);
  }

  // ── Static assets ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn static_directory_is_served_as_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>cookbook</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();

    let config = ServerConfig {
      static_dir: dir.path().to_path_buf(),
      ..ServerConfig::default()
    };
    let app = make_app(&config).await;

    let resp = send_raw(&app, "GET", "/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<h1>cookbook</h1>");

    let resp = send_raw(&app, "GET", "/app.js", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send_raw(&app, "GET", "/missing.css", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // API routes still take precedence.
    let (status, domains) = send(&app, "GET", "/api/domains", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(domains, json!([]));
  }

  #[tokio::test]
  async fn missing_static_directory_is_tolerated() {
    let app = make_app(&test_config()).await;
    let resp = send_raw(&app, "GET", "/index.html", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── CORS ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn cors_allows_any_origin_with_credentials() {
    let app = make_app(&test_config()).await;
    let resp = send_raw(
      &app,
      "GET",
      "/api/domains",
      vec![(header::ORIGIN, "http://example.test")],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert_eq!(
      headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://example.test"
    );
    assert_eq!(
      headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
      "true"
    );
  }
}
