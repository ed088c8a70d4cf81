//! Contact CRUD, scoping, search, and validation.

use http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_sets_owner_and_logs_activity() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({
                "first_name": "Dana",
                "last_name": "Reyes",
                "company": "Acme",
                "email": "dana@acme.test",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Contact created successfully");
    assert_eq!(body["data"]["status"], "active");
    assert!(body["data"]["owner"]["id"].is_string());

    let (status, activities) = app.get("/api/v1/activities", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = activities["data"]["activities"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|a| a["type"] == "contact_created" && a["title"] == "Created contact: Dana Reyes"));
}

#[tokio::test]
async fn test_create_requires_names() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "", "last_name": "Reyes" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "First name is required");

    let (status, _) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Dana", "last_name": "Reyes", "email": "nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_supports_search_and_pagination() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    for (first, company) in [("Dana", "Acme"), ("Erik", "Globex"), ("Fay", "Acme")] {
        let (status, _) = app
            .post(
                "/api/v1/contacts",
                Some(&admin),
                json!({ "first_name": first, "last_name": "Test", "company": company }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .get("/api/v1/contacts?search=acme", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 2);

    let (status, body) = app
        .get("/api/v1/contacts?page=2&limit=2", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["contacts"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["pages"], 2);
    assert_eq!(body["data"]["pagination"]["page"], 2);
}

#[tokio::test]
async fn test_list_rejects_out_of_range_paging() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, body) = app.get("/api/v1/contacts?page=0", Some(&admin)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Page must be a positive integer");

    let (status, body) = app.get("/api/v1/contacts?limit=500", Some(&admin)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Limit must be between 1 and 100");
}

#[tokio::test]
async fn test_update_cannot_reassign_owner() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Dana", "last_name": "Reyes" }),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let owner = created["data"]["owner_id"].clone();

    let (status, updated) = app
        .put(
            &format!("/api/v1/contacts/{id}"),
            Some(&admin),
            json!({
                "phone": "+1 555 0100",
                "owner_id": "11111111-1111-1111-1111-111111111111",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["phone"], "+1 555 0100");
    assert_eq!(updated["data"]["owner_id"], owner);
}

#[tokio::test]
async fn test_get_includes_attached_deals() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Dana", "last_name": "Reyes" }),
        )
        .await;
    let contact_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            "/api/v1/deals",
            Some(&admin),
            json!({ "title": "Renewal", "contact_id": contact_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .get(&format!("/api/v1/contacts/{contact_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let deals = body["data"]["deals"].as_array().unwrap();
    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0]["title"], "Renewal");
}

#[tokio::test]
async fn test_delete_removes_and_logs() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Gone", "last_name": "Soon" }),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .delete(&format!("/api/v1/contacts/{id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Contact deleted successfully");

    let (status, _) = app
        .get(&format!("/api/v1/contacts/{id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
