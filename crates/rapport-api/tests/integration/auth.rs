//! Authentication flow: health, login, registration, profile.

use http::StatusCode;
use serde_json::json;

use crate::common::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn test_health_endpoints_are_open() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server is running");

    let (status, body) = app.get("/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "v1");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/api/v1/contacts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "No token provided. Authorization header required."
    );
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::seeded().await;
    let (status, _body) = app.get("/api/v1/contacts", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login_and_profile() {
    let app = TestApp::seeded().await;
    let token = app.admin_token().await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);

    let permissions = body["data"]["permissions"].as_array().unwrap();
    assert!(permissions.iter().any(|p| p == "contacts:create"));
    assert!(permissions.iter().any(|p| p == "users:delete"));

    let roles = body["data"]["user"]["roles"].as_array().unwrap();
    assert!(roles.iter().any(|r| r["name"] == "Admin"));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_rejects_unknown_email_with_same_message() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": "nobody@crm.com", "password": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "email": "dana@crm.com",
                "password": "secret-password",
                "first_name": "Dana",
                "last_name": "Reyes",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = app.login("dana@crm.com", "secret-password").await;

    // Fresh registrations carry no roles, hence no permissions.
    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["permissions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "email": ADMIN_EMAIL,
                "password": "whatever1",
                "first_name": "Other",
                "last_name": "Admin",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = TestApp::seeded().await;

    let (status, _body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "password": "secret-password",
                "first_name": "Dana",
                "last_name": "Reyes",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({
                "email": "short@crm.com",
                "password": "abc",
                "first_name": "Dana",
                "last_name": "Reyes",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_refresh_token_cannot_access_api() {
    let app = TestApp::seeded().await;
    let (_, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        )
        .await;
    let refresh = body["data"]["refreshToken"].as_str().unwrap();

    let (status, _) = app.get("/api/v1/contacts", Some(refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_logs_and_succeeds() {
    let app = TestApp::seeded().await;
    let token = app.admin_token().await;
    let (status, body) = app
        .request("POST", "/api/v1/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");
}
