//! Role-gated administration endpoints and live role reassignment.

use http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_role_endpoints_are_admin_only() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let sales = app
        .user_with_role(&admin, "sales@crm.com", "Salesperson")
        .await;

    let (status, body) = app.get("/api/v1/roles", Some(&sales)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have the required role to perform this action."
    );
    assert_eq!(body["required_roles"][0], "Admin");

    let (status, _) = app
        .post(
            "/api/v1/users",
            Some(&sales),
            json!({
                "email": "x@crm.com",
                "password": "password1",
                "first_name": "X",
                "last_name": "Y",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_users_listing_requires_users_read() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    // Salesperson does not hold users:read.
    let sales = app
        .user_with_role(&admin, "sales@crm.com", "Salesperson")
        .await;

    let (status, body) = app.get("/api/v1/users", Some(&sales)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_permissions"][0], "users:read");

    let (status, body) = app.get("/api/v1/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert!(users.iter().any(|u| u["email"] == "sales@crm.com"));
}

#[tokio::test]
async fn test_role_change_applies_on_next_request() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let support = app
        .user_with_role(&admin, "helpdesk@crm.com", "Support")
        .await;

    // Support cannot create deals.
    let (status, _) = app
        .post(
            "/api/v1/deals",
            Some(&support),
            json!({ "title": "Not allowed" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reassign the user to Salesperson; the permission set is rebuilt
    // from storage per request, so the same token now passes.
    let (_, users) = app.get("/api/v1/users", Some(&admin)).await;
    let user_id = users["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["email"] == "helpdesk@crm.com")
        .and_then(|u| u["id"].as_str())
        .unwrap()
        .to_string();
    let (_, roles) = app.get("/api/v1/roles", Some(&admin)).await;
    let salesperson_id = roles["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Salesperson")
        .and_then(|r| r["id"].as_str())
        .unwrap()
        .to_string();
    let (status, _) = app
        .put(
            &format!("/api/v1/users/{user_id}/roles"),
            Some(&admin),
            json!({ "role_ids": [salesperson_id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/api/v1/deals",
            Some(&support),
            json!({ "title": "Allowed now" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_custom_role_grants_permissions() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    // A brand-new role with one permission granted.
    let (status, role) = app
        .post(
            "/api/v1/roles",
            Some(&admin),
            json!({ "name": "Report Viewer", "description": "Reports only" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let role_id = role["data"]["id"].as_str().unwrap().to_string();

    let (_, me) = app.get("/api/v1/auth/me", Some(&admin)).await;
    assert!(me["data"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "reports:read"));

    // Grant reports:read to the new role via the catalog entry listed on
    // the Admin role.
    let (_, roles) = app.get("/api/v1/roles", Some(&admin)).await;
    let permission_id = roles["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Admin")
        .and_then(|r| r["permissions"].as_array())
        .and_then(|perms| perms.iter().find(|p| p["name"] == "reports:read"))
        .and_then(|p| p["id"].as_str())
        .unwrap()
        .to_string();

    let (status, updated) = app
        .put(
            &format!("/api/v1/roles/{role_id}/permissions"),
            Some(&admin),
            json!({ "permission_ids": [permission_id] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated["data"]["permissions"].as_array().unwrap().len(),
        1
    );

    let viewer = app
        .user_with_role(&admin, "viewer@crm.com", "Report Viewer")
        .await;
    let (_, me) = app.get("/api/v1/auth/me", Some(&viewer)).await;
    let permissions = me["data"]["permissions"].as_array().unwrap();
    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0], "reports:read");
}

#[tokio::test]
async fn test_duplicate_role_name_conflicts() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let (status, body) = app
        .post("/api/v1/roles", Some(&admin), json!({ "name": "Admin" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Role with this name already exists");
}
