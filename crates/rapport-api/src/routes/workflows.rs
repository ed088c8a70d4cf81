//! Workflow automation rules.

use axum::extract::{Path, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use rapport_core::types::{NewWorkflow, Workflow};

use crate::extract::CurrentActor;
use crate::response::{success, success_message};
use crate::routes::support::{current, non_empty, require_permissions, user_summary};
use crate::{ApiError, AppState};

/// Workflow routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workflows).post(create_workflow))
        .route("/{id}/activate", patch(activate_workflow))
        .route("/{id}/deactivate", patch(deactivate_workflow))
}

async fn list_workflows(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["workflows:read"])?;

    let workflows = state.store.list_workflows().await;
    let mut items = Vec::with_capacity(workflows.len());
    for workflow in &workflows {
        let mut value = json!(workflow);
        value["creator"] = user_summary(&state.store, workflow.created_by).await;
        items.push(value);
    }
    Ok(Json(success(&items)))
}

async fn create_workflow(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewWorkflow>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["workflows:create"])?;
    let actor = current(actor.as_ref())?;

    non_empty("Name", &body.name)?;
    non_empty("Trigger type", &body.trigger_type)?;
    non_empty("Trigger resource", &body.trigger_resource)?;

    let workflow = state
        .store
        .insert_workflow(Workflow::from_new(body, actor.id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(success_message("Workflow created successfully", &workflow)),
    ))
}

async fn activate_workflow(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    set_active(state, actor, id, true).await
}

async fn deactivate_workflow(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    set_active(state, actor, id, false).await
}

async fn set_active(
    state: AppState,
    actor: Option<rapport_access::Actor>,
    id: Uuid,
    active: bool,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["workflows:update"])?;

    if state.store.find_workflow(id).await.is_none() {
        return Err(ApiError::not_found("Workflow"));
    }

    let workflow = state.store.set_workflow_active(id, active).await?;
    let message = if active {
        "Workflow activated successfully"
    } else {
        "Workflow deactivated successfully"
    };
    Ok(Json(success_message(message, &workflow)))
}
