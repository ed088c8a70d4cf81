//! Task access: assignee and creator both hold owner-level access,
//! deletion is creator-only.

use http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

struct TaskFixture {
    app: TestApp,
    admin: String,
    creator: String,
    assignee: String,
    outsider: String,
    task_id: String,
}

async fn fixture() -> TaskFixture {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let creator = app
        .user_with_role(&admin, "creator@crm.com", "Salesperson")
        .await;
    let assignee = app
        .user_with_role(&admin, "assignee@crm.com", "Salesperson")
        .await;
    let outsider = app
        .user_with_role(&admin, "outsider@crm.com", "Salesperson")
        .await;

    // Resolve the assignee's user id for the create payload.
    let (_, me) = app.get("/api/v1/auth/me", Some(&assignee)).await;
    let assignee_id = me["data"]["user"]["id"].as_str().unwrap().to_string();

    let (status, created) = app
        .post(
            "/api/v1/tasks",
            Some(&creator),
            json!({ "title": "Prepare demo", "assigned_to": assignee_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = created["data"]["id"].as_str().unwrap().to_string();

    TaskFixture {
        app,
        admin,
        creator,
        assignee,
        outsider,
        task_id,
    }
}

#[tokio::test]
async fn test_assignee_and_creator_can_view_outsider_cannot() {
    let f = fixture().await;
    let path = format!("/api/v1/tasks/{}", f.task_id);

    let (status, _) = f.app.get(&path, Some(&f.creator)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = f.app.get(&path, Some(&f.assignee)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = f.app.get(&path, Some(&f.outsider)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = f.app.get(&path, Some(&f.admin)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_completion_stamps_completed_at() {
    let f = fixture().await;
    let path = format!("/api/v1/tasks/{}", f.task_id);

    let (status, body) = f
        .app
        .put(&path, Some(&f.assignee), json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert!(body["data"]["completed_at"].is_string());
}

#[tokio::test]
async fn test_deletion_is_creator_only() {
    let f = fixture().await;
    let path = format!("/api/v1/tasks/{}", f.task_id);

    // The assignee may update but not delete.
    let (status, _) = f.app.delete(&path, Some(&f.assignee)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = f.app.delete(&path, Some(&f.creator)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");
}

#[tokio::test]
async fn test_task_lists_scope_by_assignee() {
    let f = fixture().await;

    let (_, assignee_list) = f.app.get("/api/v1/tasks", Some(&f.assignee)).await;
    assert_eq!(assignee_list["data"]["pagination"]["total"], 1);

    // The creator is not the assignee, so their scoped list is empty.
    let (_, creator_list) = f.app.get("/api/v1/tasks", Some(&f.creator)).await;
    assert_eq!(creator_list["data"]["pagination"]["total"], 0);

    let (_, admin_list) = f.app.get("/api/v1/tasks", Some(&f.admin)).await;
    assert_eq!(admin_list["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_unassigned_task_defaults_to_creator() {
    let f = fixture().await;
    let (status, created) = f
        .app
        .post(
            "/api/v1/tasks",
            Some(&f.creator),
            json!({ "title": "Self task" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created["data"]["assigned_to"],
        created["data"]["created_by"]
    );
}
