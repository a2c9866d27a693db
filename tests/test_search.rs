mod helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::*;
use serde_json::json;
use std::time::Duration;

async fn search(app: &TestApp, token: &str, query: &[(&str, &str)]) -> reqwest::Response {
    app.http
        .get(app.url("/api/search"))
        .query(query)
        .header(SESSION_HEADER, token)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_search_returns_upstream_body_unchanged() {
    let upstream = StubUpstream::new();
    upstream.accept_login();
    let upstream_body = json!({ "data": { "products": [{ "title": "Milk" }] } });
    upstream.respond("POST", SEARCH_PATH, 200, upstream_body.clone());
    let app = spawn_app(&upstream.spawn().await).await;
    let token = app.login_token().await;

    let response = search(
        &app,
        &token,
        &[("q", "whole milk"), ("limit", "8"), ("mode", "pickup")],
    )
    .await;
    let (status, body) = status_and_json(response).await;

    assert_eq!(status, 200);
    assert_eq!(body, upstream_body);
}

#[tokio::test]
async fn test_search_sends_encoded_term_and_parameters() {
    let upstream = StubUpstream::new();
    upstream.accept_login();
    upstream.respond("POST", SEARCH_PATH, 200, json!({ "data": {} }));
    let app = spawn_app(&upstream.spawn().await).await;
    let token = app.login_token().await;

    search(
        &app,
        &token,
        &[("q", "whole milk"), ("limit", "12"), ("mode", "delivery")],
    )
    .await;

    let request = &upstream.requests_to(SEARCH_PATH)[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.query.get("mode").map(String::as_str), Some("delivery"));
    assert_eq!(request.query.get("limit").map(String::as_str), Some("12"));
    assert_eq!(
        request.body,
        json!({
            "tagId": [],
            "categoryId": null,
            "departmentId": null,
            "eSearch": "d2hvbGUgbWlsaw=="
        })
    );
}

#[tokio::test]
async fn test_search_defaults_limit_and_mode() {
    let upstream = StubUpstream::new();
    upstream.accept_login();
    upstream.respond("POST", SEARCH_PATH, 200, json!({ "data": {} }));
    let app = spawn_app(&upstream.spawn().await).await;
    let token = app.login_token().await;

    search(&app, &token, &[("q", "eggs")]).await;

    let request = &upstream.requests_to(SEARCH_PATH)[0];
    assert_eq!(request.query.get("mode").map(String::as_str), Some("pickup"));
    assert_eq!(request.query.get("limit").map(String::as_str), Some("8"));
}

#[tokio::test]
async fn test_search_term_survives_multibyte_and_empty_input() {
    let upstream = StubUpstream::new();
    upstream.accept_login();
    upstream.respond("POST", SEARCH_PATH, 200, json!({ "data": {} }));
    let app = spawn_app(&upstream.spawn().await).await;
    let token = app.login_token().await;

    let queries = ["crème brûlée", "牛乳 🥛", ""];
    for q in queries {
        search(&app, &token, &[("q", q)]).await;
    }

    let requests = upstream.requests_to(SEARCH_PATH);
    assert_eq!(requests.len(), queries.len());
    for (request, q) in requests.iter().zip(queries) {
        let encoded = request.body["eSearch"].as_str().unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), q.as_bytes());
    }
}

#[tokio::test]
async fn test_upstream_search_error_is_internal_failure() {
    let upstream = StubUpstream::new();
    upstream.accept_login();
    upstream.respond("POST", SEARCH_PATH, 503, json!({ "message": "maintenance" }));
    let app = spawn_app(&upstream.spawn().await).await;
    let token = app.login_token().await;

    let (status, body) = status_and_json(search(&app, &token, &[("q", "milk")]).await).await;

    assert_eq!(status, 500);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Search failed: "));
    assert!(detail.contains("503"));
    assert!(detail.contains("maintenance"));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let upstream = StubUpstream::new();
    upstream.accept_login();
    upstream.respond_slowly("POST", SEARCH_PATH, json!({ "data": {} }), Duration::from_secs(3));
    let app = spawn_app_with_timeout(&upstream.spawn().await, 1).await;
    let token = app.login_token().await;

    let (status, body) = status_and_json(search(&app, &token, &[("q", "milk")]).await).await;

    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap().starts_with("Search failed: "));
}
