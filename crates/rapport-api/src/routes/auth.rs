//! Registration, login, profile, and logout.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use rapport_auth::password::{hash_password, verify_password};
use rapport_core::types::{NewUser, User};

use crate::extract::CurrentActor;
use crate::response::{message_only, success, success_message};
use crate::routes::support::{current, non_empty, user_json, valid_email};
use crate::{ApiError, AppState};

/// Routes that need no bearer token.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes behind the auth layer.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    valid_email(&body.email)?;
    if body.password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }
    non_empty("First name", &body.first_name)?;
    non_empty("Last name", &body.last_name)?;

    if state.store.find_user_by_email(&body.email).await.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let hash = hash_password(&body.password, state.config.auth.bcrypt_cost)?;
    let email = body.email.clone();
    let user = state.store.insert_user(User::from_new(body, hash)).await?;

    let token = state.tokens.issue_access(user.id)?;
    let refresh_token = state.tokens.issue_refresh(user.id)?;

    log::info!("New user registered: {email}");

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "User registered successfully",
            &json!({
                "user": user_json(&state.store, &user).await,
                "token": token,
                "refreshToken": refresh_token,
            }),
        )),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>, ApiError> {
    valid_email(&body.email)?;
    non_empty("Password", &body.password)?;

    let Some(user) = state.store.find_user_by_email(&body.email).await else {
        return Err(ApiError::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    };

    if !user.is_active {
        return Err(ApiError::Unauthenticated(
            "Your account has been deactivated. Contact administrator.".to_string(),
        ));
    }

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    }

    state.store.touch_last_login(user.id).await?;

    let token = state.tokens.issue_access(user.id)?;
    let refresh_token = state.tokens.issue_refresh(user.id)?;

    log::info!("User logged in: {}", user.email);

    Ok(Json(success_message(
        "Login successful",
        &json!({
            "user": user_json(&state.store, &user).await,
            "token": token,
            "refreshToken": refresh_token,
        }),
    )))
}

async fn me(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    let actor = current(actor.as_ref())?;
    let user = state
        .store
        .find_user(actor.id)
        .await
        .ok_or_else(|| ApiError::not_found("User"))?;

    let mut permissions: Vec<String> = actor
        .effective_permissions()
        .into_iter()
        .map(|p| p.to_string())
        .collect();
    permissions.sort();

    Ok(Json(success(&json!({
        "user": user_json(&state.store, &user).await,
        "permissions": permissions,
    }))))
}

async fn logout(CurrentActor(actor): CurrentActor) -> Result<Json<Value>, ApiError> {
    let actor = current(actor.as_ref())?;
    log::info!("User logged out: {}", actor.email);
    Ok(Json(message_only("Logged out successfully")))
}
