//! User administration.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use rapport_auth::password::hash_password;
use rapport_core::types::{NewUser, User};
use rapport_core::UserId;

use crate::extract::CurrentActor;
use crate::response::{success, success_message};
use crate::routes::support::{non_empty, require_permissions, require_roles, user_json, valid_email};
use crate::{ApiError, AppState};

/// User routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}/roles", put(set_user_roles))
}

#[derive(Debug, Deserialize)]
struct SetRolesBody {
    role_ids: Vec<Uuid>,
}

async fn list_users(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["users:read"])?;

    let users = state.store.list_users().await;
    let mut items = Vec::with_capacity(users.len());
    for user in &users {
        items.push(user_json(&state.store, user).await);
    }
    Ok(Json(success(&items)))
}

async fn create_user(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_roles(actor.as_ref(), &["Admin"])?;

    valid_email(&body.email)?;
    if body.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }
    non_empty("First name", &body.first_name)?;
    non_empty("Last name", &body.last_name)?;

    let hash = hash_password(&body.password, state.config.auth.bcrypt_cost)?;
    let user = state.store.insert_user(User::from_new(body, hash)).await?;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "User created successfully",
            &user_json(&state.store, &user).await,
        )),
    ))
}

async fn set_user_roles(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<UserId>,
    Json(body): Json<SetRolesBody>,
) -> Result<Json<Value>, ApiError> {
    require_roles(actor.as_ref(), &["Admin"])?;

    if state.store.find_user(id).await.is_none() {
        return Err(ApiError::not_found("User"));
    }

    let user = state.store.set_user_roles(id, body.role_ids).await?;

    Ok(Json(success_message(
        "User roles updated successfully",
        &user_json(&state.store, &user).await,
    )))
}
