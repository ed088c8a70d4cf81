//! Workflow automation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// An automation rule: a trigger on a record type, a condition list, and
/// an action list. Workflows are created inactive and switched on
/// explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Primary key.
    pub id: Uuid,
    /// Workflow name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// "record_created", "record_updated", "record_deleted", "time_based"
    /// or "manual".
    pub trigger_type: String,
    /// Record kind the trigger watches: "contact", "deal", "task", ...
    pub trigger_resource: String,
    /// Condition objects, evaluated against the triggering record.
    #[serde(default = "empty_array")]
    pub conditions: Value,
    /// Action objects, executed when the conditions hold.
    #[serde(default = "empty_array")]
    pub actions: Value,
    /// Whether the workflow currently fires.
    pub is_active: bool,
    /// User who created the workflow.
    pub created_by: UserId,
    /// How many times the workflow has executed.
    pub execution_count: u64,
    /// When the workflow last executed.
    #[serde(default)]
    pub last_executed_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

/// Payload for creating a workflow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWorkflow {
    /// Workflow name (required).
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Trigger kind (required).
    pub trigger_type: String,
    /// Record kind the trigger watches (required).
    pub trigger_resource: String,
    /// Condition objects.
    #[serde(default)]
    pub conditions: Option<Value>,
    /// Action objects.
    #[serde(default)]
    pub actions: Option<Value>,
}

impl Workflow {
    /// Builds a workflow created by `creator`. New workflows start
    /// inactive.
    pub fn from_new(new: NewWorkflow, creator: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            trigger_type: new.trigger_type,
            trigger_resource: new.trigger_resource,
            conditions: new.conditions.unwrap_or_else(empty_array),
            actions: new.actions.unwrap_or_else(empty_array),
            is_active: false,
            created_by: creator,
            execution_count: 0,
            last_executed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
