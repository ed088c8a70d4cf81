//! Audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// One audit trail entry, recorded after a mutating API request.
///
/// `user_id` is `None` for unauthenticated or system actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    /// Primary key.
    pub id: Uuid,
    /// User who performed the action, if authenticated.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// "create", "update", "delete", "login", ...
    pub action: String,
    /// Record kind the action touched.
    pub resource_type: String,
    /// ID of the record, when the request path carried one.
    #[serde(default)]
    pub resource_id: Option<Uuid>,
    /// Record state before the change.
    #[serde(default)]
    pub old_values: Option<Value>,
    /// Record state after the change.
    #[serde(default)]
    pub new_values: Option<Value>,
    /// Client IP address.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Client user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request path.
    pub endpoint: String,
    /// HTTP method.
    pub method: String,
    /// Response status code.
    pub status_code: u16,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    /// Records an action against a resource type.
    pub fn new(action: &str, resource_type: &str, endpoint: &str, method: &str, status: u16) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: None,
            action: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id: None,
            old_values: None,
            new_values: None,
            ip_address: None,
            user_agent: None,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            status_code: status,
            created_at: Utc::now(),
        }
    }

    /// Attributes the action to a user.
    pub fn by(mut self, user: UserId) -> Self {
        self.user_id = Some(user);
        self
    }

    /// Attaches the touched record's ID.
    pub fn on(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }
}
