//! Registration, login and gate behaviour over HTTP
#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use axum::http::StatusCode;
use serde_json::json;

mod support;
use support::{create_test_app, json_request, login, register, token_for};
use tracesrv::auth::password::HASH_PREFIX;
use tracesrv::store::UserRepository;

#[tokio::test]
async fn test_health_is_public() {
    let app = create_test_app().await;

    let (status, body) = json_request(&app.router, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["service"], "tracesrv");
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_register_returns_user_without_credential() {
    let app = create_test_app().await;

    let user = register(&app.router, "alice", "s3cret", None).await;

    assert_eq!(user["username"], "alice");
    assert_eq!(user["role"], "user");
    assert!(user["id"].as_i64().is_some());
    assert!(user.get("password").is_none());

    let row = app.store.find_by_username("alice").await.unwrap().unwrap();
    assert_ne!(row.password, "s3cret");
    assert!(row.password.starts_with(HASH_PREFIX));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = create_test_app().await;
    register(&app.router, "bob", "pw", None).await;

    let (status, body) = json_request(
        &app.router,
        "POST",
        "/auth/register",
        Some(json!({"username": "bob", "password": "other"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["error_code"], "DUPLICATE_USER");
}

#[tokio::test]
async fn test_register_rejects_blank_fields() {
    let app = create_test_app().await;

    for payload in [
        json!({"username": "  ", "password": "pw"}),
        json!({"username": "carol", "password": ""}),
    ] {
        let (status, body) =
            json_request(&app.router, "POST", "/auth/register", Some(payload), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["error_code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = create_test_app().await;
    register(&app.router, "dave", "pw", None).await;

    let (status, body) = json_request(
        &app.router,
        "POST",
        "/auth/login",
        Some(json!({"username": "dave", "password": "pw"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 3600);
    assert!(!body["data"]["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_credentials_are_unauthenticated() {
    let app = create_test_app().await;
    register(&app.router, "erin", "pw", None).await;

    for (username, password) in [("erin", "wrong"), ("nobody", "pw")] {
        let (status, body) = json_request(
            &app.router,
            "POST",
            "/auth/login",
            Some(json!({"username": username, "password": password})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["error_code"], "UNAUTHENTICATED");
        assert_eq!(body["error"]["message"], "Unauthenticated: Invalid credentials");
    }
}

#[tokio::test]
async fn test_legacy_plaintext_login_is_upgraded() {
    let app = create_test_app().await;
    app.store
        .create_user("legacy", "old-plaintext", "user")
        .await
        .unwrap();

    let token = login(&app.router, "legacy", "old-plaintext").await;
    assert!(!token.is_empty());

    let row = app.store.find_by_username("legacy").await.unwrap().unwrap();
    assert!(row.password.starts_with(HASH_PREFIX));

    // Still works against the new hash, still fails for a wrong password
    login(&app.router, "legacy", "old-plaintext").await;
    let (status, _) = json_request(
        &app.router,
        "POST",
        "/auth/login",
        Some(json!({"username": "legacy", "password": "nope"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reads_need_no_token() {
    let app = create_test_app().await;

    let (status, body) = json_request(&app.router, "GET", "/vegetables", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    // An invalid token is not even looked at on reads
    let (status, _) =
        json_request(&app.router, "GET", "/vegetables", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_writes_need_a_valid_token() {
    let app = create_test_app().await;
    let payload = json!({"Name": "Leek", "Quantity": 1});

    let (status, body) =
        json_request(&app.router, "POST", "/vegetables", Some(payload.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["error_code"], "UNAUTHENTICATED");

    let (status, _) = json_request(
        &app.router,
        "POST",
        "/vegetables",
        Some(payload.clone()),
        Some("not-a-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = token_for(&app.router, "frank", "user").await;
    let (status, body) =
        json_request(&app.router, "POST", "/vegetables", Some(payload), Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["Name"], "Leek");
}

#[tokio::test]
async fn test_delete_requires_admin_role() {
    let app = create_test_app().await;
    let user_token = token_for(&app.router, "grace", "user").await;
    let admin_token = token_for(&app.router, "root", "admin").await;
    let id = support::create_vegetable(&app.router, &user_token, "Onion", 3).await;
    let uri = format!("/vegetables/{}", id);

    let (status, _) = json_request(&app.router, "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = json_request(&app.router, "DELETE", &uri, None, Some(&user_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["error_code"], "INSUFFICIENT_ROLE");
    assert_eq!(body["error"]["details"], "admin");

    let (status, body) =
        json_request(&app.router, "DELETE", &uri, None, Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], id);

    let (status, body) = json_request(&app.router, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["error_code"], "NOT_FOUND");
}
