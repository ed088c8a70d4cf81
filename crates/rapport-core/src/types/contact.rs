//! Contact records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ids::UserId;

/// A contact: a person or lead tracked in the CRM.
///
/// `owner_id` is fixed at creation to the creating user and cannot be
/// changed by ordinary updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Primary key.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Employer.
    #[serde(default)]
    pub company: Option<String>,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or province.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// LinkedIn profile URL.
    #[serde(default)]
    pub linkedin: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Tenant-defined extra fields.
    #[serde(default = "empty_object")]
    pub custom_fields: Value,
    /// Owning user, set at creation.
    pub owner_id: UserId,
    /// Where the lead came from.
    #[serde(default)]
    pub lead_source: Option<String>,
    /// Lifecycle status, "active" by default.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Payload for creating a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewContact {
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Employer.
    #[serde(default)]
    pub company: Option<String>,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or province.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// LinkedIn profile URL.
    #[serde(default)]
    pub linkedin: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Tenant-defined extra fields.
    #[serde(default)]
    pub custom_fields: Option<Value>,
    /// Where the lead came from.
    #[serde(default)]
    pub lead_source: Option<String>,
    /// Lifecycle status; defaults to "active".
    #[serde(default)]
    pub status: Option<String>,
}

/// Partial update for a contact. Absent fields are left unchanged;
/// ownership cannot be reassigned through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPatch {
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Employer.
    #[serde(default)]
    pub company: Option<String>,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State or province.
    #[serde(default)]
    pub state: Option<String>,
    /// Country.
    #[serde(default)]
    pub country: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Website URL.
    #[serde(default)]
    pub website: Option<String>,
    /// LinkedIn profile URL.
    #[serde(default)]
    pub linkedin: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Tenant-defined extra fields.
    #[serde(default)]
    pub custom_fields: Option<Value>,
    /// Where the lead came from.
    #[serde(default)]
    pub lead_source: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<String>,
}

impl Contact {
    /// Builds a contact owned by `owner` from a creation payload.
    pub fn from_new(new: NewContact, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            position: new.position,
            address: new.address,
            city: new.city,
            state: new.state,
            country: new.country,
            postal_code: new.postal_code,
            website: new.website,
            linkedin: new.linkedin,
            tags: new.tags,
            notes: new.notes,
            custom_fields: new.custom_fields.unwrap_or_else(empty_object),
            owner_id: owner,
            lead_source: new.lead_source,
            status: new.status.unwrap_or_else(|| "active".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a patch, bumping `updated_at`.
    pub fn apply(&mut self, patch: ContactPatch) {
        macro_rules! set {
            ($field:ident) => {
                if let Some(v) = patch.$field {
                    self.$field = Some(v);
                }
            };
        }
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        set!(email);
        set!(phone);
        set!(company);
        set!(position);
        set!(address);
        set!(city);
        set!(state);
        set!(country);
        set!(postal_code);
        set!(website);
        set!(linkedin);
        set!(notes);
        set!(lead_source);
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.custom_fields {
            self.custom_fields = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.updated_at = Utc::now();
    }

    /// The contact's display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
