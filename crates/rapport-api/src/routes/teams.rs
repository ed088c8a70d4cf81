//! Teams.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::{json, Value};

use rapport_core::types::{NewTeam, Team};

use crate::extract::CurrentActor;
use crate::response::{success, success_message};
use crate::routes::support::{non_empty, require_permissions, user_summary};
use crate::{ApiError, AppState};

/// Team routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_teams).post(create_team))
}

async fn list_teams(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Value>, ApiError> {
    require_permissions(actor.as_ref(), &["teams:read"])?;

    let teams = state.store.list_teams().await;
    let mut items = Vec::with_capacity(teams.len());
    for team in &teams {
        items.push(team_json(&state, team).await);
    }
    Ok(Json(success(&items)))
}

async fn create_team(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<NewTeam>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_permissions(actor.as_ref(), &["teams:create"])?;

    non_empty("Name", &body.name)?;

    let team = state.store.insert_team(Team::from_new(body)).await?;

    Ok((
        StatusCode::CREATED,
        Json(success_message(
            "Team created successfully",
            &team_json(&state, &team).await,
        )),
    ))
}

async fn team_json(state: &AppState, team: &Team) -> Value {
    let mut value = json!(team);
    value["manager"] = match team.manager_id {
        Some(manager) => user_summary(&state.store, manager).await,
        None => Value::Null,
    };

    let mut members = Vec::new();
    for membership in state.store.team_members(team.id).await {
        let mut member = user_summary(&state.store, membership.user_id).await;
        if member.is_object() {
            member["team_role"] = json!(membership.role);
        }
        members.push(member);
    }
    value["members"] = Value::Array(members);
    value
}
