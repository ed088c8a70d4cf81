//! Deal CRUD.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use rapport_access::check_ownership;
use rapport_core::types::{Activity, Deal, DealPatch, NewDeal};
use rapport_store::query::DealFilter;
use rapport_store::OwnerScope;

use crate::extract::CurrentActor;
use crate::response::{message_only, paged_success, success, success_message, Pagination};
use crate::routes::support::{current, non_empty, require_permissions, user_summary, PageQuery};
use crate::{ApiError, AppState};

/// Deal routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_deals).post(create_deal))
        .route("/{id}", get(get_deal).put(update_deal).delete(delete_deal))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    stage: Option<String>,
    priority: Option<String>,
}

async fn list_deals(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["deals:read"])?;
    let actor = current(actor.as_ref())?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(20)?;

    let scope = if actor.is_admin() {
        OwnerScope::All
    } else {
        OwnerScope::Owned(actor.id)
    };
    let filter = DealFilter {
        stage: query.stage,
        priority: query.priority,
    };

    let result = state.store.list_deals(scope, &filter, page).await;
    let mut items = Vec::with_capacity(result.items.len());
    for deal in &result.items {
        items.push(deal_json(&state, deal).await);
    }
    let pagination = Pagination::for_page(page, &result);
    Ok(Json(paged_success("deals", &items, &pagination)))
}

async fn create_deal(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewDeal>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["deals:create"])?;
    let actor = current(actor.as_ref())?;

    non_empty("Title", &body.title)?;
    if body.value.is_some_and(|v| v < 0.0) {
        return Err(ApiError::validation("Value must be a positive number"));
    }

    let deal = state
        .store
        .insert_deal(Deal::from_new(body, actor.id))
        .await?;

    state
        .store
        .record_activity(
            Activity::new(
                "deal_created",
                format!("Created deal: {}", deal.title),
                actor.id,
            )
            .about("deal", deal.id),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "Deal created successfully",
            &deal_json(&state, &deal).await,
        )),
    ))
}

async fn get_deal(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["deals:read"])?;

    let deal = state
        .store
        .find_deal(id)
        .await
        .ok_or_else(|| ApiError::not_found("Deal"))?;

    check_ownership(actor.as_ref(), Some(&[deal.owner_id]))?;

    Ok(Json(success(&deal_json(&state, &deal).await)))
}

async fn update_deal(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(patch): Json<DealPatch>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["deals:update"])?;

    let existing = state
        .store
        .find_deal(id)
        .await
        .ok_or_else(|| ApiError::not_found("Deal"))?;

    check_ownership(actor.as_ref(), Some(&[existing.owner_id]))?;
    let actor = current(actor.as_ref())?;

    let old_stage = existing.stage.clone();
    let deal = state.store.update_deal(id, patch).await?;

    // Stage transitions get their own activity kind.
    if deal.stage != old_stage {
        state
            .store
            .record_activity(
                Activity::new(
                    "deal_stage_changed",
                    format!(
                        "Deal \"{}\" moved from {} to {}",
                        deal.title, old_stage, deal.stage
                    ),
                    actor.id,
                )
                .about("deal", deal.id),
            )
            .await;
    } else {
        state
            .store
            .record_activity(
                Activity::new(
                    "deal_updated",
                    format!("Updated deal: {}", deal.title),
                    actor.id,
                )
                .about("deal", deal.id),
            )
            .await;
    }

    Ok(Json(success_message(
        "Deal updated successfully",
        &deal_json(&state, &deal).await,
    )))
}

async fn delete_deal(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["deals:delete"])?;

    let existing = state
        .store
        .find_deal(id)
        .await
        .ok_or_else(|| ApiError::not_found("Deal"))?;

    check_ownership(actor.as_ref(), Some(&[existing.owner_id]))?;
    let actor = current(actor.as_ref())?;

    let removed = state.store.delete_deal(id).await?;

    state
        .store
        .record_activity(Activity::new(
            "deal_deleted",
            format!("Deleted deal: {}", removed.title),
            actor.id,
        ))
        .await;

    Ok(Json(message_only("Deal deleted successfully")))
}

async fn deal_json(state: &AppState, deal: &Deal) -> Value {
    let mut value = json!(deal);
    value["owner"] = user_summary(&state.store, deal.owner_id).await;
    if let Some(contact_id) = deal.contact_id {
        value["contact"] = match state.store.find_contact(contact_id).await {
            Some(contact) => json!({
                "id": contact.id,
                "first_name": contact.first_name,
                "last_name": contact.last_name,
                "company": contact.company,
            }),
            None => Value::Null,
        };
    }
    value
}
