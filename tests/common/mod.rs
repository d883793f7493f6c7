//! Mock upstream provider and router helpers shared by the integration tests
//!
//! The mock answers every path. Tests queue responses before a request and
//! inspect what the proxy sent afterwards.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{connect_info::MockConnectInfo, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use image_proxy::config::{AppConfig, SearchProviderConfig};
use image_proxy::{build_router, ProxyState};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub const UNSPLASH_KEY: &str = "unsplash-test-key";
pub const PIXABAY_KEY: &str = "pixabay-test-key";
pub const RUNWARE_KEY: &str = "runware-test-key";
pub const RUNWARE_UUID: &str = "a770f077-f413-47de-9dac-be0b26a35da6";
pub const RUNWARE_MODEL: &str = "runware:100@1";

/// A response the mock will serve for the next request
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "application/json".to_string(),
        }
    }

    pub fn error(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "application/json".to_string(),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "text/html".to_string(),
        }
    }
}

/// A request received by the mock
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Value,
}

impl ReceivedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Default)]
struct UpstreamState {
    response_queue: VecDeque<MockResponse>,
    received_requests: Vec<ReceivedRequest>,
}

type SharedUpstreamState = Arc<Mutex<UpstreamState>>;

/// In-process HTTP server standing in for all three providers
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: SharedUpstreamState,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = SharedUpstreamState::default();
        let app = Router::new()
            .fallback(handle_any)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock upstream failed");
        });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn queue(&self, response: MockResponse) {
        self.state.lock().unwrap().response_queue.push_back(response);
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.state.lock().unwrap().received_requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().received_requests.len()
    }
}

async fn handle_any(State(state): State<SharedUpstreamState>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = url::form_urlencoded::parse(request.uri().query().unwrap_or("").as_bytes())
        .into_owned()
        .collect();
    let bytes = axum::body::to_bytes(request.into_body(), 10 * 1024 * 1024)
        .await
        .unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    let mock = {
        let mut state = state.lock().unwrap();
        state.received_requests.push(ReceivedRequest {
            method,
            path,
            query,
            body,
        });
        state
            .response_queue
            .pop_front()
            .unwrap_or_else(|| MockResponse::json(r#"{"results":[]}"#))
    };

    Response::builder()
        .status(mock.status)
        .header(header::CONTENT_TYPE, mock.content_type)
        .body(Body::from(mock.body))
        .unwrap()
}

/// Config with every provider pointed at `upstream` and fully credentialed
pub fn test_config(upstream: &MockUpstream, static_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.unsplash = SearchProviderConfig {
        url: upstream.url("/search/photos"),
        api_key: Some(UNSPLASH_KEY.to_string()),
    };
    config.providers.pixabay = SearchProviderConfig {
        url: upstream.url("/api/"),
        api_key: Some(PIXABAY_KEY.to_string()),
    };
    config.providers.runware.url = upstream.url("/v1");
    config.providers.runware.api_key = Some(RUNWARE_KEY.to_string());
    config.providers.runware.task_uuid = Some(RUNWARE_UUID.to_string());
    config.providers.runware.model = Some(RUNWARE_MODEL.to_string());
    config.upstream.timeout_seconds = 5;
    config.assets.dir = static_dir.display().to_string();
    config
}

/// Application router with every request appearing to come from `peer`
pub fn app(config: AppConfig, peer: SocketAddr) -> Router {
    let state = ProxyState::new(config).unwrap();
    build_router(state).layer(MockConnectInfo(peer))
}

pub fn peer(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([203, 0, 113, last_octet], 50000))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub async fn send(app: &Router, request: axum::http::Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_json(app: &Router, path: &str, body: Value) -> TestResponse {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: &Router, path: &str) -> TestResponse {
    let request = axum::http::Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}
