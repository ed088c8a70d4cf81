//! Task CRUD.
//!
//! Tasks have two owner-identifying fields: read and update extend to the
//! assignee and the creator, deletion is reserved for the creator.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use rapport_access::check_ownership;
use rapport_core::types::{Activity, NewTask, Task, TaskPatch};
use rapport_store::query::TaskFilter;
use rapport_store::OwnerScope;

use crate::extract::CurrentActor;
use crate::response::{message_only, paged_success, success, success_message, Pagination};
use crate::routes::support::{current, non_empty, require_permissions, user_summary, PageQuery};
use crate::{ApiError, AppState};

/// Task routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/{id}", get(get_task).put(update_task).delete(delete_task))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    priority: Option<String>,
}

async fn list_tasks(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["tasks:read"])?;
    let actor = current(actor.as_ref())?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(20)?;

    // Non-admins see only tasks assigned to them.
    let scope = if actor.is_admin() {
        OwnerScope::All
    } else {
        OwnerScope::Owned(actor.id)
    };
    let filter = TaskFilter {
        status: query.status,
        priority: query.priority,
    };

    let result = state.store.list_tasks(scope, &filter, page).await;
    let mut items = Vec::with_capacity(result.items.len());
    for task in &result.items {
        items.push(task_json(&state, task).await);
    }
    let pagination = Pagination::for_page(page, &result);
    Ok(Json(paged_success("tasks", &items, &pagination)))
}

async fn create_task(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewTask>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["tasks:create"])?;
    let actor = current(actor.as_ref())?;

    non_empty("Title", &body.title)?;

    let task = state
        .store
        .insert_task(Task::from_new(body, actor.id))
        .await?;

    state
        .store
        .record_activity(
            Activity::new(
                "task_created",
                format!("Created task: {}", task.title),
                actor.id,
            )
            .about("task", task.id),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "Task created successfully",
            &task_json(&state, &task).await,
        )),
    ))
}

async fn get_task(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["tasks:read"])?;

    let task = state
        .store
        .find_task(id)
        .await
        .ok_or_else(|| ApiError::not_found("Task"))?;

    check_ownership(actor.as_ref(), Some(&task.owner_candidates()))?;

    Ok(Json(success(&task_json(&state, &task).await)))
}

async fn update_task(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["tasks:update"])?;

    let existing = state
        .store
        .find_task(id)
        .await
        .ok_or_else(|| ApiError::not_found("Task"))?;

    check_ownership(actor.as_ref(), Some(&existing.owner_candidates()))?;
    let actor = current(actor.as_ref())?;

    let task = state.store.update_task(id, patch).await?;

    state
        .store
        .record_activity(
            Activity::new(
                "task_updated",
                format!("Updated task: {}", task.title),
                actor.id,
            )
            .about("task", task.id),
        )
        .await;

    Ok(Json(success_message(
        "Task updated successfully",
        &task_json(&state, &task).await,
    )))
}

async fn delete_task(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["tasks:delete"])?;

    let existing = state
        .store
        .find_task(id)
        .await
        .ok_or_else(|| ApiError::not_found("Task"))?;

    // Only the creator (or an admin) may delete a task.
    check_ownership(actor.as_ref(), Some(&[existing.created_by]))?;
    let actor = current(actor.as_ref())?;

    let removed = state.store.delete_task(id).await?;

    state
        .store
        .record_activity(Activity::new(
            "task_deleted",
            format!("Deleted task: {}", removed.title),
            actor.id,
        ))
        .await;

    Ok(Json(message_only("Task deleted successfully")))
}

async fn task_json(state: &AppState, task: &Task) -> Value {
    let mut value = json!(task);
    value["assignee"] = user_summary(&state.store, task.assigned_to).await;
    value["creator"] = user_summary(&state.store, task.created_by).await;
    value
}
