//! Contact CRUD.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use rapport_access::check_ownership;
use rapport_core::types::{Activity, Contact, ContactPatch, NewContact};
use rapport_store::query::ContactFilter;
use rapport_store::OwnerScope;

use crate::extract::CurrentActor;
use crate::response::{paged_success, success, success_message, Pagination};
use crate::routes::support::{
    current, non_empty, require_permissions, user_summary, valid_email, PageQuery,
};
use crate::{ApiError, AppState};

/// Contact routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route(
            "/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    search: Option<String>,
    status: Option<String>,
}

async fn list_contacts(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["contacts:read"])?;
    let actor = current(actor.as_ref())?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .resolve(10)?;

    // Non-admins see only their own contacts.
    let scope = if actor.is_admin() {
        OwnerScope::All
    } else {
        OwnerScope::Owned(actor.id)
    };
    let filter = ContactFilter {
        search: query.search,
        status: query.status,
    };

    let result = state.store.list_contacts(scope, &filter, page).await;
    let mut items = Vec::with_capacity(result.items.len());
    for contact in &result.items {
        items.push(contact_json(&state, contact).await);
    }
    let pagination = Pagination::for_page(page, &result);
    Ok(Json(paged_success("contacts", &items, &pagination)))
}

async fn create_contact(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewContact>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["contacts:create"])?;
    let actor = current(actor.as_ref())?;

    non_empty("First name", &body.first_name)?;
    non_empty("Last name", &body.last_name)?;
    if let Some(email) = body.email.as_deref() {
        valid_email(email)?;
    }

    // The creating user becomes the owner.
    let contact = state
        .store
        .insert_contact(Contact::from_new(body, actor.id))
        .await?;

    state
        .store
        .record_activity(
            Activity::new(
                "contact_created",
                format!("Created contact: {}", contact.full_name()),
                actor.id,
            )
            .about("contact", contact.id),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "Contact created successfully",
            &contact_json(&state, &contact).await,
        )),
    ))
}

async fn get_contact(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["contacts:read"])?;

    let contact = state
        .store
        .find_contact(id)
        .await
        .ok_or_else(|| ApiError::not_found("Contact"))?;

    check_ownership(actor.as_ref(), Some(&[contact.owner_id]))?;

    let mut value = contact_json(&state, &contact).await;
    value["deals"] = json!(state.store.deals_for_contact(contact.id).await);
    Ok(Json(success(&value)))
}

async fn update_contact(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["contacts:update"])?;

    let existing = state
        .store
        .find_contact(id)
        .await
        .ok_or_else(|| ApiError::not_found("Contact"))?;

    check_ownership(actor.as_ref(), Some(&[existing.owner_id]))?;
    let actor = current(actor.as_ref())?;

    if let Some(email) = patch.email.as_deref() {
        valid_email(email)?;
    }

    let contact = state.store.update_contact(id, patch).await?;

    state
        .store
        .record_activity(
            Activity::new(
                "contact_updated",
                format!("Updated contact: {}", contact.full_name()),
                actor.id,
            )
            .about("contact", contact.id),
        )
        .await;

    Ok(Json(success_message(
        "Contact updated successfully",
        &contact_json(&state, &contact).await,
    )))
}

async fn delete_contact(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["contacts:delete"])?;

    let existing = state
        .store
        .find_contact(id)
        .await
        .ok_or_else(|| ApiError::not_found("Contact"))?;

    check_ownership(actor.as_ref(), Some(&[existing.owner_id]))?;
    let actor = current(actor.as_ref())?;

    let removed = state.store.delete_contact(id).await?;

    state
        .store
        .record_activity(Activity::new(
            "contact_deleted",
            format!("Deleted contact: {}", removed.full_name()),
            actor.id,
        ))
        .await;

    Ok(Json(crate::response::message_only(
        "Contact deleted successfully",
    )))
}

async fn contact_json(state: &AppState, contact: &Contact) -> Value {
    let mut value = json!(contact);
    value["owner"] = user_summary(&state.store, contact.owner_id).await;
    value
}
