//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ids::UserId;

/// A user account.
///
/// The password hash is write-only: it is never serialized into API
/// responses (the original backend stripped it in `toJSON`; here serde
/// skips the field entirely).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: UserId,
    /// Login email, unique across the system.
    pub email: String,
    /// bcrypt hash of the password. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional avatar URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Deactivated accounts cannot authenticate.
    pub is_active: bool,
    /// Timestamp of the most recent successful login.
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    /// The user's manager, if any.
    #[serde(default)]
    pub manager_id: Option<UserId>,
    /// IDs of the roles assigned to this user.
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional manager assignment.
    #[serde(default)]
    pub manager_id: Option<UserId>,
}

impl User {
    /// Builds a user record from a creation payload and a pre-computed
    /// password hash. New accounts start active with no roles.
    pub fn from_new(new: NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email: new.email,
            password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            avatar: None,
            is_active: true,
            last_login: None,
            manager_id: new.manager_id,
            role_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The user's display name ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
