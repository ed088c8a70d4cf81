//! The access decision checks.
//!
//! Each check is a pure, stateless function evaluated once per request.
//! Rules apply in a fixed order and the first match wins. A forbidden
//! outcome for an authenticated actor logs one warning naming the actor
//! and what was required; logging is best-effort and cannot fail the
//! request. Nothing here mutates state.

use crate::directory::Directory;
use crate::error::AccessError;
use crate::policy::{Actor, Permission, RoleName};
use rapport_core::UserId;

/// Checks that the actor holds at least one of `required`.
///
/// There is no Admin bypass here: an admin passes because the Admin role
/// is granted every permission, not because of its name.
pub fn check_permission(
    actor: Option<&Actor>,
    required: &[Permission],
) -> Result<(), AccessError> {
    let actor = actor.ok_or(AccessError::Unauthenticated)?;

    if actor.holds_any(required) {
        return Ok(());
    }

    log::warn!(
        "User {} attempted to access resource without permission: {}",
        actor.email,
        join(required.iter().map(Permission::as_str)),
    );
    Err(AccessError::MissingPermission)
}

/// Checks that the actor holds at least one of the `required` role names.
///
/// The Admin role passes unconditionally, whether or not it is listed.
pub fn check_role(actor: Option<&Actor>, required: &[RoleName]) -> Result<(), AccessError> {
    let actor = actor.ok_or(AccessError::Unauthenticated)?;

    if actor.is_admin() || actor.has_any_role(required) {
        return Ok(());
    }

    log::warn!(
        "User {} attempted to access resource without role: {}",
        actor.email,
        join(required.iter().map(RoleName::as_str)),
    );
    Err(AccessError::MissingRole)
}

/// Checks that the actor owns the target record.
///
/// `owners` carries the value(s) of the record's owner-identifying field,
/// or `None` when the record was not loaded. A missing record reports
/// [`AccessError::NotFound`] — never forbidden — so a denial does not
/// reveal whether the record exists under a different owner. Most records
/// have a single owner field; tasks pass both assignee and creator where
/// either is granted owner-level access.
pub fn check_ownership(
    actor: Option<&Actor>,
    owners: Option<&[UserId]>,
) -> Result<(), AccessError> {
    let actor = actor.ok_or(AccessError::Unauthenticated)?;

    if actor.is_admin() {
        return Ok(());
    }

    let owners = owners.ok_or(AccessError::NotFound)?;
    if owners.contains(&actor.id) {
        return Ok(());
    }

    log::warn!(
        "User {} attempted to access resource owned by another user",
        actor.email
    );
    Err(AccessError::NotOwner)
}

/// Checks that the actor may access a record through team membership:
/// the actor is the record's owner, or shares at least one team with the
/// owner. Admin passes unconditionally; a missing record is not-found.
pub async fn check_team_access<D>(
    actor: Option<&Actor>,
    owner: Option<UserId>,
    directory: &D,
) -> Result<(), AccessError>
where
    D: Directory + ?Sized,
{
    let actor = actor.ok_or(AccessError::Unauthenticated)?;

    if actor.is_admin() {
        return Ok(());
    }

    let owner = owner.ok_or(AccessError::NotFound)?;
    if owner == actor.id {
        return Ok(());
    }

    let actor_teams = directory
        .teams_of(actor.id)
        .await
        .map_err(AccessError::Directory)?;
    let owner_teams = directory
        .teams_of(owner)
        .await
        .map_err(AccessError::Directory)?;

    if actor_teams.iter().any(|team| owner_teams.contains(team)) {
        return Ok(());
    }

    log::warn!(
        "User {} attempted to access resource owned by another user",
        actor.email
    );
    Err(AccessError::NotOwner)
}

/// Checks that the actor may access a record as the owner's manager:
/// the actor is the record's owner, or the owner's `manager_id` equals
/// the actor. Admin passes unconditionally; a missing record is
/// not-found.
pub async fn check_manager_access<D>(
    actor: Option<&Actor>,
    owner: Option<UserId>,
    directory: &D,
) -> Result<(), AccessError>
where
    D: Directory + ?Sized,
{
    let actor = actor.ok_or(AccessError::Unauthenticated)?;

    if actor.is_admin() {
        return Ok(());
    }

    let owner = owner.ok_or(AccessError::NotFound)?;
    if owner == actor.id {
        return Ok(());
    }

    let manager = directory
        .manager_of(owner)
        .await
        .map_err(AccessError::Directory)?;
    if manager == Some(actor.id) {
        return Ok(());
    }

    log::warn!(
        "User {} attempted to access resource owned by another user",
        actor.email
    );
    Err(AccessError::NotOwner)
}

fn join<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}
