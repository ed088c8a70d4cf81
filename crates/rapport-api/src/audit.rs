//! Audit trail middleware.
//!
//! Records every mutating request (POST/PUT/PATCH/DELETE) with the acting
//! user, the touched resource, and the response status. Recording is
//! best-effort: it can never fail or delay the response.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use rapport_access::Actor;
use rapport_core::types::AuditLog;

use crate::AppState;

/// Layer body for `axum::middleware::from_fn_with_state`.
pub async fn record_audit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user = req.extensions().get::<Actor>().map(|a| a.id);
    let user_agent = req
        .headers()
        .get(http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = next.run(req).await;

    let action = match method.as_str() {
        "POST" => "create",
        "PUT" | "PATCH" => "update",
        "DELETE" => "delete",
        _ => return response,
    };

    let mut entry = AuditLog::new(
        action,
        resource_type(&path),
        &path,
        method.as_str(),
        response.status().as_u16(),
    );
    entry.user_id = user;
    entry.resource_id = resource_id(&path);
    entry.user_agent = user_agent;
    state.store.record_audit(entry).await;

    response
}

/// The resource a path touches: the first segment after the API prefix.
fn resource_type(path: &str) -> &str {
    path.split('/')
        .filter(|s| !s.is_empty())
        .find(|s| *s != "api" && *s != "v1")
        .unwrap_or("unknown")
}

/// The record ID carried in the path, if any segment parses as a UUID.
fn resource_id(path: &str) -> Option<Uuid> {
    path.split('/').rev().find_map(|s| s.parse::<Uuid>().ok())
}
