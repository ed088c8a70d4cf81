//! Task records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// A task, assigned to one user and created by another (possibly the same).
///
/// Tasks have two owner-identifying fields: `assigned_to` and `created_by`.
/// Read and update access extends to both; deletion is reserved for the
/// creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Primary key.
    pub id: Uuid,
    /// Task title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the task is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// "low", "medium" or "high".
    pub priority: String,
    /// "pending", "in-progress", "completed" or "cancelled".
    pub status: String,
    /// User the task is assigned to.
    pub assigned_to: UserId,
    /// User who created the task.
    pub created_by: UserId,
    /// Stamped when the status first becomes "completed".
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Kind of record this task relates to ("contact", "deal", ...).
    #[serde(default)]
    pub related_to_type: Option<String>,
    /// ID of the related record.
    #[serde(default)]
    pub related_to_id: Option<Uuid>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tenant-defined extra fields.
    #[serde(default = "empty_object")]
    pub custom_fields: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Payload for creating a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    /// Task title (required).
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the task is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Priority label; defaults to "medium".
    #[serde(default)]
    pub priority: Option<String>,
    /// Assignee; defaults to the creating user.
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    /// Kind of record this task relates to.
    #[serde(default)]
    pub related_to_type: Option<String>,
    /// ID of the related record.
    #[serde(default)]
    pub related_to_id: Option<Uuid>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tenant-defined extra fields.
    #[serde(default)]
    pub custom_fields: Option<Value>,
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    /// Task title.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the task is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Priority label.
    #[serde(default)]
    pub priority: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<String>,
    /// Reassign the task.
    #[serde(default)]
    pub assigned_to: Option<UserId>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Tenant-defined extra fields.
    #[serde(default)]
    pub custom_fields: Option<Value>,
}

impl Task {
    /// Builds a task created by `creator` from a creation payload.
    /// Unassigned tasks fall back to the creator as assignee.
    pub fn from_new(new: NewTask, creator: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            due_date: new.due_date,
            priority: new.priority.unwrap_or_else(|| "medium".to_string()),
            status: "pending".to_string(),
            assigned_to: new.assigned_to.unwrap_or(creator),
            created_by: creator,
            completed_at: None,
            related_to_type: new.related_to_type,
            related_to_id: new.related_to_id,
            tags: new.tags,
            custom_fields: new.custom_fields.unwrap_or_else(empty_object),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch, bumping `updated_at`. Moving the status to
    /// "completed" stamps `completed_at`.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = Some(v);
        }
        if let Some(v) = patch.due_date {
            self.due_date = Some(v);
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.assigned_to {
            self.assigned_to = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.custom_fields {
            self.custom_fields = v;
        }
        if let Some(status) = patch.status {
            if status == "completed" && self.status != "completed" {
                self.completed_at = Some(Utc::now());
            }
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    /// The users granted owner-level access to this task.
    pub fn owner_candidates(&self) -> [UserId; 2] {
        [self.assigned_to, self.created_by]
    }
}
