//! The audit trail, readable by Admins and Auditors only.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use rapport_core::UserId;
use rapport_store::query::AuditFilter;

use crate::extract::CurrentActor;
use crate::response::{paged_success, success, Pagination};
use crate::routes::support::{require_roles, user_summary, PageQuery};
use crate::{ApiError, AppState};

/// Who may read the audit trail.
const AUDIT_READERS: &[&str] = &["Admin", "Auditor"];

/// Audit trail routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logs", get(list_logs))
        .route("/logs/{id}", get(get_log))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    user_id: Option<UserId>,
    action: Option<String>,
    resource_type: Option<String>,
}

async fn list_logs(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    require_roles(actor.as_ref(), AUDIT_READERS)?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(50)?;
    let filter = AuditFilter {
        user_id: query.user_id,
        action: query.action,
        resource_type: query.resource_type,
    };

    let result = state.store.list_audit_logs(&filter, page).await;
    let mut items = Vec::with_capacity(result.items.len());
    for entry in &result.items {
        let mut value = json!(entry);
        value["user"] = match entry.user_id {
            Some(user) => user_summary(&state.store, user).await,
            None => Value::Null,
        };
        items.push(value);
    }
    let pagination = Pagination::for_page(page, &result);
    Ok(Json(paged_success("logs", &items, &pagination)))
}

async fn get_log(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_roles(actor.as_ref(), AUDIT_READERS)?;

    let entry = state
        .store
        .find_audit_log(id)
        .await
        .ok_or_else(|| ApiError::not_found("Audit log"))?;

    let mut value = json!(entry);
    value["user"] = match entry.user_id {
        Some(user) => user_summary(&state.store, user).await,
        None => Value::Null,
    };
    Ok(Json(success(&value)))
}
