//! The activity feed.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use rapport_core::types::Activity;
use rapport_core::UserId;
use rapport_store::query::ActivityFilter;

use crate::extract::CurrentActor;
use crate::response::{paged_success, success_message, Pagination};
use crate::routes::support::{current, non_empty, require_permissions, PageQuery};
use crate::{ApiError, AppState};

/// Activity routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_activities).post(create_activity))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    r#type: Option<String>,
    user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    r#type: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    related_to_type: Option<String>,
    #[serde(default)]
    related_to_id: Option<Uuid>,
    #[serde(default)]
    metadata: Option<Value>,
}

async fn list_activities(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["activities:read"])?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(50)?;
    let filter = ActivityFilter {
        kind: query.r#type,
        user_id: query.user_id,
    };

    let result = state.store.list_activities(&filter, page).await;
    let mut items = Vec::with_capacity(result.items.len());
    for activity in &result.items {
        let mut value = json!(activity);
        value["user"] = match state.store.find_user(activity.user_id).await {
            Some(user) => json!({
                "id": user.id,
                "first_name": user.first_name,
                "last_name": user.last_name,
                "avatar": user.avatar,
            }),
            None => Value::Null,
        };
        items.push(value);
    }
    let pagination = Pagination::for_page(page, &result);
    Ok(Json(paged_success("activities", &items, &pagination)))
}

async fn create_activity(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["activities:create"])?;
    let actor = current(actor.as_ref())?;

    non_empty("Type", &body.r#type)?;
    non_empty("Title", &body.title)?;

    let mut activity = Activity::new(&body.r#type, body.title, actor.id);
    activity.description = body.description;
    activity.related_to_type = body.related_to_type;
    activity.related_to_id = body.related_to_id;
    if let Some(metadata) = body.metadata {
        activity.metadata = metadata;
    }

    let activity = state.store.record_activity(activity).await;

    Ok((
        StatusCode::CREATED,
        Json(success_message("Activity logged successfully", &activity)),
    ))
}
