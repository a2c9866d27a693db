use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as the fake retailer saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct StubResponse {
    status: u16,
    body: Value,
    set_cookie: Option<String>,
    delay: Option<Duration>,
}

/// In-process stand-in for the retailer API. Responses are registered per
/// method and path; every request is recorded.
#[derive(Clone, Default)]
pub struct StubUpstream {
    routes: Arc<Mutex<HashMap<(String, String), StubResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.insert(method, path, StubResponse {
            status,
            body,
            set_cookie: None,
            delay: None,
        });
    }

    pub fn respond_with_cookie(&self, method: &str, path: &str, status: u16, body: Value, cookie: &str) {
        self.insert(method, path, StubResponse {
            status,
            body,
            set_cookie: Some(cookie.to_string()),
            delay: None,
        });
    }

    pub fn respond_slowly(&self, method: &str, path: &str, body: Value, delay: Duration) {
        self.insert(method, path, StubResponse {
            status: 200,
            body,
            set_cookie: None,
            delay: Some(delay),
        });
    }

    /// Accept any login with a session cookie.
    pub fn accept_login(&self) {
        self.respond_with_cookie(
            "POST",
            LOGIN_PATH,
            200,
            json!({ "success": true }),
            "retailer_session=abc123; Path=/",
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Serve on an ephemeral local port and return the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new().fallback(handle).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn insert(&self, method: &str, path: &str, response: StubResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), response);
    }
}

pub const LOGIN_PATH: &str = "/rest-proxy/v2/auth/login";
pub const SEARCH_PATH: &str = "/rest-proxy/v2/layout/stores/2047/products/search";
pub const CART_PATH: &str = "/rest-proxy/v2/layout/cart/add";

pub fn product_path(id: &str) -> String {
    format!("/rest-proxy/v2/layout/stores/2047/products/{}", id)
}

async fn handle(
    State(stub): State<StubUpstream>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers: headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    stub.requests.lock().unwrap().push(recorded);

    let response = stub
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned();

    let Some(response) = response else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no stub" }))).into_response();
    };

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap();
    let mut reply = (status, Json(response.body)).into_response();
    if let Some(cookie) = response.set_cookie {
        reply
            .headers_mut()
            .insert(axum::http::header::SET_COOKIE, cookie.parse().unwrap());
    }
    reply
}
