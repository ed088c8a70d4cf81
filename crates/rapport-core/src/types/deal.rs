//! Deal records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// Pipeline stages a deal moves through.
pub const DEAL_STAGES: [&str; 6] = [
    "lead",
    "qualified",
    "proposal",
    "negotiation",
    "closed-won",
    "closed-lost",
];

/// A sales deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    /// Primary key.
    pub id: Uuid,
    /// Deal title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Monetary value.
    pub value: f64,
    /// ISO currency code, "USD" by default.
    pub currency: String,
    /// Pipeline stage, one of [`DEAL_STAGES`].
    pub stage: String,
    /// Win probability, 0-100.
    pub probability: u8,
    /// Expected close date.
    #[serde(default)]
    pub expected_close_date: Option<DateTime<Utc>>,
    /// Actual close date.
    #[serde(default)]
    pub actual_close_date: Option<DateTime<Utc>>,
    /// Associated contact, if any.
    #[serde(default)]
    pub contact_id: Option<Uuid>,
    /// Owning user, set at creation.
    pub owner_id: UserId,
    /// Priority label, "medium" by default.
    pub priority: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tenant-defined extra fields.
    #[serde(default = "empty_object")]
    pub custom_fields: Value,
    /// Why the deal was lost, for closed-lost deals.
    #[serde(default)]
    pub lost_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Payload for creating a deal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDeal {
    /// Deal title (required).
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Monetary value; must not be negative.
    #[serde(default)]
    pub value: Option<f64>,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Initial stage; defaults to "lead".
    #[serde(default)]
    pub stage: Option<String>,
    /// Win probability, 0-100.
    #[serde(default)]
    pub probability: Option<u8>,
    /// Expected close date.
    #[serde(default)]
    pub expected_close_date: Option<DateTime<Utc>>,
    /// Associated contact.
    #[serde(default)]
    pub contact_id: Option<Uuid>,
    /// Priority label.
    #[serde(default)]
    pub priority: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tenant-defined extra fields.
    #[serde(default)]
    pub custom_fields: Option<Value>,
}

/// Partial update for a deal. Ownership cannot be reassigned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealPatch {
    /// Deal title.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Monetary value.
    #[serde(default)]
    pub value: Option<f64>,
    /// ISO currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Pipeline stage.
    #[serde(default)]
    pub stage: Option<String>,
    /// Win probability, 0-100.
    #[serde(default)]
    pub probability: Option<u8>,
    /// Expected close date.
    #[serde(default)]
    pub expected_close_date: Option<DateTime<Utc>>,
    /// Actual close date.
    #[serde(default)]
    pub actual_close_date: Option<DateTime<Utc>>,
    /// Associated contact.
    #[serde(default)]
    pub contact_id: Option<Uuid>,
    /// Priority label.
    #[serde(default)]
    pub priority: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Tenant-defined extra fields.
    #[serde(default)]
    pub custom_fields: Option<Value>,
    /// Why the deal was lost.
    #[serde(default)]
    pub lost_reason: Option<String>,
}

impl Deal {
    /// Builds a deal owned by `owner` from a creation payload.
    pub fn from_new(new: NewDeal, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            value: new.value.unwrap_or(0.0),
            currency: new.currency.unwrap_or_else(|| "USD".to_string()),
            stage: new.stage.unwrap_or_else(|| "lead".to_string()),
            probability: new.probability.unwrap_or(0),
            expected_close_date: new.expected_close_date,
            actual_close_date: None,
            contact_id: new.contact_id,
            owner_id: owner,
            priority: new.priority.unwrap_or_else(|| "medium".to_string()),
            tags: new.tags,
            custom_fields: new.custom_fields.unwrap_or_else(empty_object),
            lost_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch, bumping `updated_at`.
    pub fn apply(&mut self, patch: DealPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = Some(v);
        }
        if let Some(v) = patch.value {
            self.value = v;
        }
        if let Some(v) = patch.currency {
            self.currency = v;
        }
        if let Some(v) = patch.stage {
            self.stage = v;
        }
        if let Some(v) = patch.probability {
            self.probability = v;
        }
        if let Some(v) = patch.expected_close_date {
            self.expected_close_date = Some(v);
        }
        if let Some(v) = patch.actual_close_date {
            self.actual_close_date = Some(v);
        }
        if let Some(v) = patch.contact_id {
            self.contact_id = Some(v);
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.custom_fields {
            self.custom_fields = v;
        }
        if let Some(v) = patch.lost_reason {
            self.lost_reason = Some(v);
        }
        self.updated_at = Utc::now();
    }
}
