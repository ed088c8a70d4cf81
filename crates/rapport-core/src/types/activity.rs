//! Activity feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// One entry in the activity feed: something a user did, optionally tied
/// to a record ("contact", "deal", "task", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Primary key.
    pub id: Uuid,
    /// Activity kind, e.g. "call", "note", "contact_created".
    pub r#type: String,
    /// Short human-readable summary.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// User who performed the activity.
    pub user_id: UserId,
    /// Kind of record this activity relates to.
    #[serde(default)]
    pub related_to_type: Option<String>,
    /// ID of the related record.
    #[serde(default)]
    pub related_to_id: Option<Uuid>,
    /// Extra data specific to the activity kind.
    #[serde(default = "empty_object")]
    pub metadata: Value,
    /// When the activity happened.
    pub created_at: DateTime<Utc>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Activity {
    /// Records an activity by `user` with no related record.
    pub fn new(r#type: &str, title: String, user: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            r#type: r#type.to_string(),
            title,
            description: None,
            user_id: user,
            related_to_type: None,
            related_to_id: None,
            metadata: empty_object(),
            created_at: Utc::now(),
        }
    }

    /// Attaches the related record.
    pub fn about(mut self, kind: &str, id: Uuid) -> Self {
        self.related_to_type = Some(kind.to_string());
        self.related_to_id = Some(id);
        self
    }
}
