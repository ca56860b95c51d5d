//! Shared helpers for the HTTP integration tests
#![allow(dead_code)]
#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::sqlite::SqliteClient;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use tracesrv::store::{schema, SqliteStore};
use tracesrv::{create_routes, AppState, Config};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router over a private in-memory database
pub struct TestApp {
    pub router: Router,
    pub store: SqliteStore,
}

pub async fn create_test_app() -> TestApp {
    let mut config = Config::default();
    config.auth.jwt_secret = TEST_SECRET.to_string();

    let client = SqliteClient::in_memory().await.unwrap();
    schema::init_schema(client.pool()).await.unwrap();
    let store = SqliteStore::new(client.pool().clone());

    let state = Arc::new(AppState::new(Arc::new(config), Arc::new(client)).unwrap());
    TestApp {
        router: create_routes(state),
        store,
    }
}

/// Send a request with an optional JSON body and bearer token
pub async fn json_request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, body)
}

pub async fn register(app: &Router, username: &str, password: &str, role: Option<&str>) -> Value {
    let (status, body) = json_request(
        app,
        "POST",
        "/auth/register",
        Some(json!({"username": username, "password": password, "role": role})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["data"].clone()
}

pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = json_request(
        app,
        "POST",
        "/auth/login",
        Some(json!({"username": username, "password": password})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

/// Register and log in, returning a token
pub async fn token_for(app: &Router, username: &str, role: &str) -> String {
    register(app, username, "pw", Some(role)).await;
    login(app, username, "pw").await
}

/// Create a vegetable and return its id
pub async fn create_vegetable(app: &Router, token: &str, name: &str, quantity: i64) -> i64 {
    let (status, body) = json_request(
        app,
        "POST",
        "/vegetables",
        Some(json!({"Name": name, "Quantity": quantity})),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"]["ID"].as_i64().unwrap()
}

pub async fn edit(app: &Router, token: &str, id: i64, edit: Value) -> (StatusCode, Value) {
    json_request(
        app,
        "PATCH",
        &format!("/vegetables/{}", id),
        Some(edit),
        Some(token),
    )
    .await
}
