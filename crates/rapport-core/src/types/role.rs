//! Roles and the stored permission catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named bundle of permissions assignable to users.
///
/// System roles (seeded at install time) cannot be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Primary key.
    pub id: Uuid,
    /// Unique role name, e.g. "Admin" or "Sales Manager".
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// System roles are seeded and protected from deletion.
    pub is_system: bool,
    /// Inactive roles grant nothing.
    pub is_active: bool,
    /// IDs of the permissions granted by this role.
    #[serde(default)]
    pub permission_ids: Vec<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a role.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRole {
    /// Unique role name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Role {
    /// Builds a role from a creation payload. Roles created through the
    /// API are never system roles.
    pub fn from_new(new: NewRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            is_system: false,
            is_active: true,
            permission_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A catalog entry for one permission token.
///
/// The token itself is `resource:action` (see `rapport-access`); the
/// catalog keeps the split parts and a human description alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// Primary key.
    pub id: Uuid,
    /// Full token, e.g. "contacts:update". Unique.
    pub name: String,
    /// Resource part of the token.
    pub resource: String,
    /// Action part of the token.
    pub action: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

impl PermissionEntry {
    /// Builds a catalog entry from its parts.
    pub fn new(resource: &str, action: &str, description: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{resource}:{action}"),
            resource: resource.to_string(),
            action: action.to_string(),
            description: Some(description.to_string()),
        }
    }
}
