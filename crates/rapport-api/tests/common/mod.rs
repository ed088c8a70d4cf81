//! Common test harness for API integration tests.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use rapport_api::{build_router, AppState};
use rapport_core::config::{AuthSettings, RapportConfig};
use rapport_store::{seed, Store};

/// Minimum bcrypt cost keeps the tests fast.
const TEST_BCRYPT_COST: u32 = 4;

/// Seed admin credentials.
pub const ADMIN_EMAIL: &str = "admin@crm.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// A fully wired application over a seeded in-memory store.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Builds the app with the seed catalog loaded.
    pub async fn seeded() -> Self {
        let store = Arc::new(Store::new());
        seed::seed(&store, TEST_BCRYPT_COST)
            .await
            .expect("seed should succeed");

        let config = RapportConfig {
            auth: AuthSettings {
                jwt_secret: "integration-test-secret".to_string(),
                access_token_ttl_secs: 3600,
                refresh_token_ttl_secs: 7200,
                bcrypt_cost: TEST_BCRYPT_COST,
            },
            ..Default::default()
        };
        let state = AppState::new(store, config);
        Self {
            router: build_router(state),
        }
    }

    /// Sends one request; returns status and parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .expect("body should collect");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request("POST", path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", path, token, Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("PATCH", path, token, None).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", path, token, None).await
    }

    /// Logs in and returns the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("login response should carry a token")
            .to_string()
    }

    /// Logs in as the seeded admin.
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Creates a user via the admin endpoints, assigns the named role,
    /// and returns that user's access token.
    pub async fn user_with_role(&self, admin_token: &str, email: &str, role: &str) -> String {
        let (status, body) = self
            .post(
                "/api/v1/users",
                Some(admin_token),
                json!({
                    "email": email,
                    "password": "password1",
                    "first_name": "Test",
                    "last_name": "User",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "user create failed: {body}");
        let user_id = body["data"]["id"].as_str().expect("user id").to_string();

        let (status, roles) = self.get("/api/v1/roles", Some(admin_token)).await;
        assert_eq!(status, StatusCode::OK, "role listing failed: {roles}");
        let role_id = roles["data"]
            .as_array()
            .expect("roles array")
            .iter()
            .find(|r| r["name"] == role)
            .and_then(|r| r["id"].as_str())
            .unwrap_or_else(|| panic!("role {role} should exist"))
            .to_string();

        let (status, body) = self
            .put(
                &format!("/api/v1/users/{user_id}/roles"),
                Some(admin_token),
                json!({ "role_ids": [role_id] }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "role assign failed: {body}");

        self.login(email, "password1").await
    }
}
