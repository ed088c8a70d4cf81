//! Email templates and the outbound queue.
//!
//! Sending is queue-only: a send request records a pending `EmailLog`;
//! actual delivery is out of scope.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde_json::Value;

use rapport_core::types::{EmailLog, EmailTemplate, NewEmailLog, NewEmailTemplate};

use crate::extract::CurrentActor;
use crate::response::{success, success_message};
use crate::routes::support::{current, non_empty, require_permissions, valid_email};
use crate::{ApiError, AppState};

/// Email routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route("/send", post(send_email))
        .route("/logs", get(list_logs))
}

async fn list_templates(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["emails:read"])?;
    let templates = state.store.list_active_email_templates().await;
    Ok(Json(success(&templates)))
}

async fn create_template(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewEmailTemplate>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["emails:create"])?;
    let actor = current(actor.as_ref())?;

    non_empty("Name", &body.name)?;
    non_empty("Subject", &body.subject)?;
    non_empty("Body", &body.body_html)?;

    let template = state
        .store
        .insert_email_template(EmailTemplate::from_new(body, actor.id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "Email template created successfully",
            &template,
        )),
    ))
}

async fn send_email(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewEmailLog>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["emails:send"])?;
    let actor = current(actor.as_ref())?;

    valid_email(&body.to_email)?;
    non_empty("Subject", &body.subject)?;

    let to_email = body.to_email.clone();
    let log = state
        .store
        .record_email(EmailLog::queued(body, actor.id))
        .await;

    log::info!("Email queued for sending to: {to_email}");

    Ok((
        StatusCode::ACCEPTED,
        Json(success_message("Email queued for sending", &log)),
    ))
}

async fn list_logs(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["emails:read"])?;
    let logs = state.store.list_email_logs(100).await;
    Ok(Json(success(&logs)))
}
