//! Common test utilities and helpers
//!
//! `MockPve` is an in-process stand-in for a PVE node: it answers canned
//! envelopes per (method, path) and records every request it sees.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use pve_client::Session;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const TICKET: &str = "PVE:root@pam:65F0A1B2::c2lnbmF0dXJl";
pub const CSRF: &str = "65F0A1B2:Y3NyZg";

/// One request as the server saw it, with the `/api2/json` prefix removed
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn form(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), (u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockPve {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let raw = uri.path().strip_prefix("/api2/json").unwrap_or(uri.path());
    let path = urlencoding::decode(raw)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        headers,
        body,
    });

    let (status, body) = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned()
        .unwrap_or((501, json!({"data": null}).to_string()));

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json;charset=UTF-8")],
        body,
    )
}

impl MockPve {
    pub async fn start() -> Self {
        init_tracing();

        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Mock that already accepts `root@pam` and issues [`TICKET`]/[`CSRF`]
    pub async fn with_login() -> Self {
        let mock = Self::start().await;
        mock.respond_data(
            "POST",
            "/access/ticket",
            json!({
                "ticket": TICKET,
                "CSRFPreventionToken": CSRF,
                "username": "root@pam",
                "cap": {}
            }),
        );
        mock
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
    }

    /// 200 with `{"data": data}`
    pub fn respond_data(&self, method: &str, path: &str, data: Value) {
        self.respond(method, path, 200, json!({ "data": data }));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    pub async fn login(&self) -> Session {
        Session::login(&self.url(), "root", "secret")
            .await
            .expect("login against mock failed")
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}
