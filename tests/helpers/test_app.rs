use basket_relay::bootstrap::{build_app, build_app_state_with};
use basket_relay::config::Config;
use basket_relay::domain::ports::session_repository::SessionRepository;
use basket_relay::infrastructure::persistence::InMemorySessionRepository;
use basket_relay::infrastructure::providers::HttpRetailerClientFactory;
use serde_json::{json, Value};
use std::sync::Arc;

pub const SESSION_HEADER: &str = "X-Session-ID";

/// The gateway served on an ephemeral port, wired to a given upstream.
pub struct TestApp {
    pub address: String,
    pub sessions: Arc<InMemorySessionRepository>,
    pub http: reqwest::Client,
}

pub async fn spawn_app(upstream_base_url: &str) -> TestApp {
    spawn_app_with_timeout(upstream_base_url, 5).await
}

pub async fn spawn_app_with_timeout(upstream_base_url: &str, timeout_secs: u64) -> TestApp {
    let timeout = timeout_secs.to_string();
    let config = Config::from_vars(|key| match key {
        "UPSTREAM_BASE_URL" => Some(upstream_base_url.to_string()),
        "UPSTREAM_TIMEOUT_SECS" => Some(timeout.clone()),
        _ => None,
    })
    .expect("Failed to build test config");

    let sessions = Arc::new(InMemorySessionRepository::new());
    let state = build_app_state_with(
        sessions.clone(),
        Arc::new(HttpRetailerClientFactory::new(config.upstream.clone())),
    );
    let app = build_app(state, &config).expect("Failed to build router");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://{}", addr),
        sessions,
        http: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.http
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Log in and return the issued session token.
    pub async fn login_token(&self) -> String {
        let response = self.login("a@b.com", "x").await;
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        body["session_id"].as_str().unwrap().to_string()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.count_sessions().await.unwrap()
    }
}

/// Status code and parsed JSON body of a gateway response.
pub async fn status_and_json(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}
