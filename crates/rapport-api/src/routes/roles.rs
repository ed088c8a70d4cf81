//! Role administration.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use rapport_core::types::{NewRole, Role};

use crate::extract::CurrentActor;
use crate::response::{success, success_message};
use crate::routes::support::{non_empty, require_roles, role_json};
use crate::{ApiError, AppState};

/// Role routes. All of them are Admin-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/{id}/permissions", put(set_role_permissions))
}

#[derive(Debug, Deserialize)]
struct SetPermissionsBody {
    permission_ids: Vec<Uuid>,
}

async fn list_roles(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    require_roles(actor.as_ref(), &["Admin"])?;

    let roles = state.store.list_roles().await;
    let mut items = Vec::with_capacity(roles.len());
    for role in &roles {
        items.push(role_json(&state.store, role).await);
    }
    Ok(Json(success(&items)))
}

async fn create_role(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewRole>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_roles(actor.as_ref(), &["Admin"])?;

    non_empty("Name", &body.name)?;

    let role = state.store.insert_role(Role::from_new(body)).await?;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "Role created successfully",
            &role_json(&state.store, &role).await,
        )),
    ))
}

async fn set_role_permissions(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(body): Json<SetPermissionsBody>,
) -> Result<Json<Value>, ApiError> {
    require_roles(actor.as_ref(), &["Admin"])?;

    if state.store.find_role(id).await.is_none() {
        return Err(ApiError::not_found("Role"));
    }

    let role = state
        .store
        .set_role_permissions(id, body.permission_ids)
        .await?;

    Ok(Json(success_message(
        "Role permissions updated successfully",
        &role_json(&state.store, &role).await,
    )))
}
