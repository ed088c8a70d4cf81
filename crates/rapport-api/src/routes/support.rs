//! Handler support: access guards, input validation, pagination query
//! parsing, and JSON view builders.

use serde::Deserialize;
use serde_json::{json, Value};

use rapport_access::{check_permission, check_role, AccessError, Actor, Permission, RoleName};
use rapport_core::types::{Role, User};
use rapport_core::UserId;
use rapport_store::{Page, Store};

use crate::ApiError;

/// The maximum page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Requires any one of the listed permission tokens.
///
/// A denial carries the required token list in the response, as the
/// original 403 bodies did.
pub fn require_permissions(actor: Option<&Actor>, tokens: &[&str]) -> Result<(), ApiError> {
    let required = parse_tokens(tokens)?;
    check_permission(actor, &required).map_err(|err| match err {
        AccessError::MissingPermission => ApiError::Forbidden {
            message: err.to_string(),
            required_permissions: Some(tokens.iter().map(|t| t.to_string()).collect()),
            required_roles: None,
        },
        other => other.into(),
    })
}

/// Requires any one of the listed role names (Admin always passes).
pub fn require_roles(actor: Option<&Actor>, names: &[&str]) -> Result<(), ApiError> {
    let required: Vec<RoleName> = names.iter().map(|n| RoleName::from(*n)).collect();
    check_role(actor, &required).map_err(|err| match err {
        AccessError::MissingRole => ApiError::Forbidden {
            message: err.to_string(),
            required_permissions: None,
            required_roles: Some(names.iter().map(|n| n.to_string()).collect()),
        },
        other => other.into(),
    })
}

/// The authenticated actor, or the standard 401.
pub fn current(actor: Option<&Actor>) -> Result<&Actor, ApiError> {
    actor.ok_or_else(|| ApiError::Unauthenticated(AccessError::Unauthenticated.to_string()))
}

fn parse_tokens(tokens: &[&str]) -> Result<Vec<Permission>, ApiError> {
    tokens
        .iter()
        .map(|t| {
            t.parse::<Permission>()
                .map_err(|e| ApiError::Internal(format!("bad permission literal: {e}")))
        })
        .collect()
}

// ============================================================================
// Validation
// ============================================================================

/// Requires a non-empty, non-whitespace value.
pub fn non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Requires a plausible email shape (local@domain with a dotted domain).
pub fn valid_email(value: &str) -> Result<(), ApiError> {
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        });
    if !valid {
        return Err(ApiError::validation("Valid email is required"));
    }
    Ok(())
}

// ============================================================================
// Pagination
// ============================================================================

/// `page`/`limit` query parameters shared by the paged listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Records per page, capped at [`MAX_PAGE_LIMIT`].
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Validates and resolves the page request.
    pub fn resolve(&self, default_limit: u32) -> Result<Page, ApiError> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::validation("Page must be a positive integer"));
        }
        let limit = self.limit.unwrap_or(default_limit);
        if limit < 1 || limit > MAX_PAGE_LIMIT {
            return Err(ApiError::validation("Limit must be between 1 and 100"));
        }
        Ok(Page { page, limit })
    }
}

// ============================================================================
// JSON views
// ============================================================================

/// `{id, first_name, last_name, email}` for embedding an owner or
/// assignee; JSON null when the user no longer exists.
pub async fn user_summary(store: &Store, id: UserId) -> Value {
    match store.find_user(id).await {
        Some(user) => json!({
            "id": user.id,
            "first_name": user.first_name,
            "last_name": user.last_name,
            "email": user.email,
        }),
        None => Value::Null,
    }
}

/// A role with its permission entries resolved.
pub async fn role_json(store: &Store, role: &Role) -> Value {
    let permissions = store.permissions_of(role).await;
    let mut value = json!(role);
    value["permissions"] = json!(permissions);
    value
}

/// A user with its roles (and their permissions) resolved.
pub async fn user_json(store: &Store, user: &User) -> Value {
    let mut roles = Vec::new();
    for role in store.roles_of(user).await {
        roles.push(role_json(store, &role).await);
    }
    let mut value = json!(user);
    value["roles"] = Value::Array(roles);
    value
}
