//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use site_sync::config::BackendConfig;
use site_sync::remote::{RemoteError, RemoteResult, StaticStore};
use site_sync::PageKey;
use tokio::net::TcpListener;
use tokio::sync::Barrier;

pub const TOKEN: &str = "test-token";

/// State behind the mock REST backend.
#[derive(Default)]
pub struct MockState {
    /// Stored `attributes` per page title.
    pub pages: Mutex<HashMap<String, Value>>,
    /// Request log, e.g. "POST update-static home".
    pub calls: Mutex<Vec<String>>,
    /// Image ids whose delete returns 500.
    pub undeletable: Mutex<HashSet<u64>>,
}

impl MockState {
    pub fn with_pages(pages: Value) -> Arc<Self> {
        let state = Self::default();
        if let Value::Object(map) = pages {
            state.pages.lock().unwrap().extend(map);
        }
        Arc::new(state)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page(&self, title: &str) -> Option<Value> {
        self.pages.lock().unwrap().get(title).cloned()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn title(query: &HashMap<String, String>) -> String {
    query.get("title").cloned().unwrap_or_default()
}

async fn get_static(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let title = title(&query);
    state.record(format!("GET static {title}"));
    match state.page(&title) {
        Some(attributes) => Json(json!({ "attributes": attributes })).into_response(),
        None => (StatusCode::NOT_FOUND, "static page not found").into_response(),
    }
}

async fn update_static(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let title = title(&query);
    state.record(format!("POST update-static {title}"));
    let mut pages = state.pages.lock().unwrap();
    match pages.get_mut(&title) {
        Some(slot) => {
            *slot = body["attributes"].clone();
            Json(json!({ "message": "updated" })).into_response()
        }
        None => (StatusCode::NOT_FOUND, "static page not found").into_response(),
    }
}

async fn add_static(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let title = body["title"].as_str().unwrap_or_default().to_string();
    state.record(format!("POST add-static {title}"));
    state
        .pages
        .lock()
        .unwrap()
        .insert(title, body["attributes"].clone());
    (StatusCode::CREATED, Json(json!({ "message": "created" }))).into_response()
}

async fn upload_image(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));
    if !authorized(&headers) || !multipart || body.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    state.record("POST image".to_string());
    Json(json!({ "data": { "id": 42, "url": "/uploads/42.png" } })).into_response()
}

async fn delete_image(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    state.record(format!("DELETE image {id}"));
    if state.undeletable.lock().unwrap().contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "storage offline").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn slow_static() -> Response {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({ "attributes": {} })).into_response()
}

/// Headers after 1.2s, body 1.2s later.
async fn trickle_static() -> Response {
    tokio::time::sleep(Duration::from_millis(1200)).await;
    let body = futures_util::stream::once(async {
        tokio::time::sleep(Duration::from_millis(1200)).await;
        Ok::<_, std::convert::Infallible>(Bytes::from_static(br#"{"attributes":{}}"#))
    });
    axum::http::Response::builder()
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(body))
        .unwrap()
}

/// Start the mock backend on an ephemeral port. API lives under `/api`;
/// `/slow` never answers in time and `/trickle` answers in two slow halves.
pub async fn start_mock_backend(state: Arc<MockState>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/api/static", get(get_static))
        .route("/api/update-static", post(update_static))
        .route("/api/add-static", post(add_static))
        .route("/api/image", post(upload_image))
        .route("/api/image/{id}", delete(delete_image))
        .route("/slow/static", get(slow_static))
        .route("/trickle/static", get(trickle_static))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

pub fn backend_config(addr: SocketAddr, prefix: &str) -> BackendConfig {
    BackendConfig {
        base_url: format!("http://{addr}/{prefix}"),
        image_domain: format!("http://{addr}"),
        token: Some(TOKEN.to_string()),
        request_timeout_secs: 5,
    }
}

/// In-process `StaticStore` with scripted failures.
#[derive(Default)]
pub struct ScriptedStore {
    pub fetch: HashMap<PageKey, Value>,
    pub fetch_fails: HashSet<PageKey>,
    pub update_fails: HashSet<PageKey>,
    pub create_fails: HashSet<PageKey>,
    pub calls: Mutex<Vec<(&'static str, PageKey)>>,
    pub written: Mutex<HashMap<PageKey, Map<String, Value>>>,
    /// When set, fetches and updates wait here until enough calls are in flight.
    pub barrier: Option<Arc<Barrier>>,
}

impl ScriptedStore {
    fn error() -> RemoteError {
        RemoteError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "scripted failure".into(),
        }
    }

    fn record(&self, op: &'static str, page: PageKey) {
        self.calls.lock().unwrap().push((op, page));
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(o, _)| *o == op).count()
    }

    async fn rendezvous(&self) {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
    }
}

#[async_trait]
impl StaticStore for ScriptedStore {
    async fn fetch_page(&self, page: PageKey) -> RemoteResult<Value> {
        self.record("fetch", page);
        self.rendezvous().await;
        tokio::task::yield_now().await;
        if self.fetch_fails.contains(&page) {
            return Err(Self::error());
        }
        Ok(self.fetch.get(&page).cloned().unwrap_or_else(|| json!({})))
    }

    async fn update_page(
        &self,
        page: PageKey,
        attributes: &Map<String, Value>,
    ) -> RemoteResult<()> {
        self.record("update", page);
        self.rendezvous().await;
        if self.update_fails.contains(&page) {
            return Err(Self::error());
        }
        self.written.lock().unwrap().insert(page, attributes.clone());
        Ok(())
    }

    async fn create_page(
        &self,
        page: PageKey,
        attributes: &Map<String, Value>,
    ) -> RemoteResult<()> {
        self.record("create", page);
        if self.create_fails.contains(&page) {
            return Err(Self::error());
        }
        self.written.lock().unwrap().insert(page, attributes.clone());
        Ok(())
    }
}
