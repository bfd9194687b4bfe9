#![allow(dead_code)]

use std::sync::Arc;

use abinject_api::config::{LogFormat, ServerConfig, StoreBackend};
use abinject_api::router::build_app_router;
use abinject_api::state::AppState;
use abinject_core::types::DbId;
use abinject_db::models::script::{
    CreateScript, Script, ScriptPage, ScriptQuery, ScriptSummary, UpdateScript,
};
use abinject_db::store::{MemoryScriptStore, ScriptStore, StoreError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const PUBLIC_BASE_URL: &str = "https://scripts.example.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: PUBLIC_BASE_URL.to_string(),
        store_backend: StoreBackend::Memory,
        database_url: None,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router around `store`, with the same
/// middleware stack production uses.
pub fn build_test_app(store: Arc<dyn ScriptStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Application backed by a fresh, empty in-memory store.
pub fn memory_app() -> Router {
    build_test_app(Arc::new(MemoryScriptStore::new()))
}

/// Application whose store fails every call.
pub fn failing_app() -> Router {
    build_test_app(Arc::new(FailingStore))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a script through the API and return its `data` object.
pub async fn create_script(app: &Router, name: &str, code: &str) -> serde_json::Value {
    let body = serde_json::json!({ "name": name, "code": code });
    let response = post_json(app.clone(), "/api/v1/scripts", body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}

/// Create and publish a script, returning the published `data` object.
pub async fn create_published_script(
    app: &Router,
    name: &str,
    code: &str,
) -> serde_json::Value {
    let created = create_script(app, name, code).await;
    let uri = format!("/api/v1/scripts/{}/publish", created["id"]);
    let response = post_empty(app.clone(), &uri).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Failing store
// ---------------------------------------------------------------------------

/// A store whose backend is permanently unreachable.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl ScriptStore for FailingStore {
    async fn create(&self, _input: &CreateScript) -> Result<Script, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: DbId) -> Result<Option<Script>, StoreError> {
        Err(unavailable())
    }

    async fn list_all(&self) -> Result<Vec<ScriptSummary>, StoreError> {
        Err(unavailable())
    }

    async fn search(&self, _query: &ScriptQuery) -> Result<ScriptPage, StoreError> {
        Err(unavailable())
    }

    async fn update(
        &self,
        _id: DbId,
        _input: &UpdateScript,
    ) -> Result<Option<Script>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: DbId) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn publish(&self, _id: DbId, _candidate: &str) -> Result<Option<Script>, StoreError> {
        Err(unavailable())
    }

    async fn unpublish(&self, _id: DbId) -> Result<Option<Script>, StoreError> {
        Err(unavailable())
    }

    async fn find_published_by_public_id(
        &self,
        _public_id: &str,
    ) -> Result<Option<Script>, StoreError> {
        Err(unavailable())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
