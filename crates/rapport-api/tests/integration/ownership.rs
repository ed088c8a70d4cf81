//! Ownership enforcement and the Admin bypass, end to end.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::TestApp;

#[tokio::test]
async fn test_foreign_owner_is_forbidden_admin_bypasses() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let alice = app
        .user_with_role(&admin, "alice@crm.com", "Salesperson")
        .await;
    let bob = app
        .user_with_role(&admin, "bob@crm.com", "Salesperson")
        .await;

    let (status, created) = app
        .post(
            "/api/v1/contacts",
            Some(&alice),
            json!({ "first_name": "Alices", "last_name": "Lead" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Bob holds contacts:read, but the record belongs to Alice.
    let (status, body) = app.get(&format!("/api/v1/contacts/{id}"), Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have permission to access this resource."
    );

    let (status, _) = app
        .put(
            &format!("/api/v1/contacts/{id}"),
            Some(&bob),
            json!({ "notes": "mine now" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin passes every ownership check regardless of owner.
    let (status, _) = app
        .get(&format!("/api/v1/contacts/{id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .put(
            &format!("/api/v1/contacts/{id}"),
            Some(&admin),
            json!({ "notes": "admin note" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_lists_are_owner_scoped_for_non_admins() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let alice = app
        .user_with_role(&admin, "alice@crm.com", "Salesperson")
        .await;
    let bob = app
        .user_with_role(&admin, "bob@crm.com", "Salesperson")
        .await;

    for token in [&alice, &bob] {
        let (status, _) = app
            .post(
                "/api/v1/contacts",
                Some(token),
                json!({ "first_name": "Lead", "last_name": "Record" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, alice_list) = app.get("/api/v1/contacts", Some(&alice)).await;
    assert_eq!(alice_list["data"]["pagination"]["total"], 1);

    let (_, admin_list) = app.get("/api/v1/contacts", Some(&admin)).await;
    assert_eq!(admin_list["data"]["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_missing_record_is_404_not_403() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let alice = app
        .user_with_role(&admin, "alice@crm.com", "Salesperson")
        .await;

    let (status, body) = app
        .get(&format!("/api/v1/contacts/{}", Uuid::new_v4()), Some(&alice))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Contact not found");
}

#[tokio::test]
async fn test_permission_check_passes_while_ownership_denies() {
    // The §8 scenario: a Salesperson holds contacts:update, so creating
    // and updating their own records works, but updating a record owned
    // by someone else is denied by the ownership check, not the
    // permission check.
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let alice = app
        .user_with_role(&admin, "alice@crm.com", "Salesperson")
        .await;

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Admins", "last_name": "Lead" }),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Alice's own record updates fine (permission + ownership pass).
    let (_, own) = app
        .post(
            "/api/v1/contacts",
            Some(&alice),
            json!({ "first_name": "Own", "last_name": "Lead" }),
        )
        .await;
    let own_id = own["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .put(
            &format!("/api/v1/contacts/{own_id}"),
            Some(&alice),
            json!({ "notes": "updated" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The admin-owned record is denied with the ownership message.
    let (status, body) = app
        .put(
            &format!("/api/v1/contacts/{id}"),
            Some(&alice),
            json!({ "notes": "not mine" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have permission to access this resource."
    );
}

#[tokio::test]
async fn test_missing_permission_denies_with_required_list() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    // Support holds contacts:read but not contacts:delete.
    let support = app
        .user_with_role(&admin, "support@crm.com", "Support")
        .await;

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Keep", "last_name": "Me" }),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .delete(&format!("/api/v1/contacts/{id}"), Some(&support))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have permission to perform this action."
    );
    assert_eq!(body["required_permissions"][0], "contacts:delete");
}
