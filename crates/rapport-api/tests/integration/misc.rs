//! Deals, workflows, emails, teams, and the audit trail.

use http::StatusCode;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_deal_stage_change_logs_dedicated_activity() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .post(
            "/api/v1/deals",
            Some(&admin),
            json!({ "title": "Expansion", "stage": "qualified", "value": 5000.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(
            &format!("/api/v1/deals/{id}"),
            Some(&admin),
            json!({ "stage": "proposal" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, activities) = app
        .get("/api/v1/activities?type=deal_stage_changed", Some(&admin))
        .await;
    let entries = activities["data"]["activities"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0]["title"],
        "Deal \"Expansion\" moved from qualified to proposal"
    );
}

#[tokio::test]
async fn test_deal_rejects_negative_value() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let (status, body) = app
        .post(
            "/api/v1/deals",
            Some(&admin),
            json!({ "title": "Bad", "value": -5.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Value must be a positive number");
}

#[tokio::test]
async fn test_workflow_activation_cycle() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .post(
            "/api/v1/workflows",
            Some(&admin),
            json!({
                "name": "Welcome email",
                "trigger_type": "record_created",
                "trigger_resource": "contact",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["is_active"], false);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .patch(&format!("/api/v1/workflows/{id}/activate"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], true);
    assert_eq!(body["message"], "Workflow activated successfully");

    let (status, body) = app
        .patch(&format!("/api/v1/workflows/{id}/deactivate"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);
}

#[tokio::test]
async fn test_email_queue_flow() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/emails/templates",
            Some(&admin),
            json!({
                "name": "Welcome",
                "subject": "Hello",
                "body_html": "<p>Hi {{first_name}}</p>",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/v1/emails/templates", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .post(
            "/api/v1/emails/send",
            Some(&admin),
            json!({
                "from_email": "noreply@crm.com",
                "to_email": "dana@acme.test",
                "subject": "Quote",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["message"], "Email queued for sending");
    assert_eq!(body["data"]["status"], "pending");

    let (status, body) = app.get("/api/v1/emails/logs", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["to_email"], "dana@acme.test");
}

#[tokio::test]
async fn test_marketing_can_send_but_not_delete_contacts() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;
    let marketing = app
        .user_with_role(&admin, "marketing@crm.com", "Marketing")
        .await;

    let (status, _) = app
        .post(
            "/api/v1/emails/send",
            Some(&marketing),
            json!({
                "from_email": "noreply@crm.com",
                "to_email": "lead@acme.test",
                "subject": "Campaign",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&marketing),
            json!({ "first_name": "Cam", "last_name": "Paign" }),
        )
        .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .delete(&format!("/api/v1/contacts/{id}"), Some(&marketing))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_team_listing_includes_members() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .post(
            "/api/v1/teams",
            Some(&admin),
            json!({ "name": "Enterprise Sales" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["name"], "Enterprise Sales");

    let (status, body) = app.get("/api/v1/teams", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let teams = body["data"].as_array().unwrap();
    assert_eq!(teams.len(), 1);
    assert!(teams[0]["members"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_audit_trail_records_mutations_for_admins_and_auditors() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (_, created) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "Aud", "last_name": "Ited" }),
        )
        .await;
    let contact_id = created["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .delete(&format!("/api/v1/contacts/{contact_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get("/api/v1/audit/logs?resource_type=contacts", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let logs = body["data"]["logs"].as_array().unwrap();
    assert!(logs.iter().any(|l| l["action"] == "create"));
    assert!(logs
        .iter()
        .any(|l| l["action"] == "delete" && l["resource_id"] == contact_id.as_str()));
    assert!(logs.iter().all(|l| l["user"]["email"] == "admin@crm.com"));

    // Salespeople cannot read the trail; a bare Auditor role can.
    let sales = app
        .user_with_role(&admin, "sales@crm.com", "Salesperson")
        .await;
    let (status, _) = app.get("/api/v1/audit/logs", Some(&sales)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/v1/roles", Some(&admin), json!({ "name": "Auditor" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let auditor = app
        .user_with_role(&admin, "auditor@crm.com", "Auditor")
        .await;
    let (status, _) = app.get("/api/v1/audit/logs", Some(&auditor)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_audit_log_detail_and_unknown_id() {
    let app = TestApp::seeded().await;
    let admin = app.admin_token().await;

    let (_, _) = app
        .post(
            "/api/v1/contacts",
            Some(&admin),
            json!({ "first_name": "One", "last_name": "Entry" }),
        )
        .await;

    let (_, listing) = app.get("/api/v1/audit/logs", Some(&admin)).await;
    let entry_id = listing["data"]["logs"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .get(&format!("/api/v1/audit/logs/{entry_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], entry_id.as_str());

    let (status, body) = app
        .get(
            &format!("/api/v1/audit/logs/{}", uuid::Uuid::new_v4()),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Audit log not found");
}
