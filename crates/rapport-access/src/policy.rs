//! Permission and role value objects, and the per-request actor.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rapport_core::{Error, UserId};

/// The role name that bypasses every role, ownership, team, and manager
/// check in the system. This is the single definition of that rule.
pub const ADMIN_ROLE: &str = "Admin";

/// An atomic `resource:action` capability token, e.g. `contacts:update`.
///
/// The set of permissions is flat: no wildcards, no inheritance. A token
/// must have a non-empty resource and action separated by exactly one
/// colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permission {
    token: String,
}

impl Permission {
    /// Builds a permission from its parts.
    pub fn new(resource: &str, action: &str) -> Result<Self, Error> {
        format!("{resource}:{action}").parse()
    }

    /// The full token.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// The resource part of the token.
    pub fn resource(&self) -> &str {
        self.token.split(':').next().unwrap_or_default()
    }

    /// The action part of the token.
    pub fn action(&self) -> &str {
        self.token.split(':').nth(1).unwrap_or_default()
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((resource, action)) = s.split_once(':') else {
            return Err(Error::validation_field(
                "permission",
                format!("'{s}' is not of the form resource:action"),
            ));
        };
        if resource.is_empty() || action.is_empty() || action.contains(':') {
            return Err(Error::validation_field(
                "permission",
                format!("'{s}' is not of the form resource:action"),
            ));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(Error::validation_field(
                "permission",
                format!("'{s}' contains whitespace"),
            ));
        }
        Ok(Self {
            token: s.to_string(),
        })
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token)
    }
}

impl Serialize for Permission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token)
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A role name. Compared by exact string equality; roles are not
/// hierarchical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a role name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the [`ADMIN_ROLE`].
    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One of an actor's assigned roles, with the permissions it grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRole {
    /// The role's name.
    pub name: RoleName,
    /// Permission tokens granted by the role.
    pub permissions: Vec<Permission>,
}

/// The authenticated identity a request acts as.
///
/// Built fresh for every request from the user's current role assignment;
/// nothing here is cached across requests, so a role or permission change
/// takes effect on the next request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// The user's ID.
    pub id: UserId,
    /// The user's email, used in denial log lines.
    pub email: String,
    /// The user's assigned roles with their permissions.
    pub roles: Vec<ActorRole>,
}

impl Actor {
    /// Builds an actor from its parts.
    pub fn new(id: UserId, email: impl Into<String>, roles: Vec<ActorRole>) -> Self {
        Self {
            id,
            email: email.into(),
            roles,
        }
    }

    /// Whether the actor holds the [`ADMIN_ROLE`].
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r.name.is_admin())
    }

    /// The actor's role names.
    pub fn role_names(&self) -> impl Iterator<Item = &RoleName> {
        self.roles.iter().map(|r| &r.name)
    }

    /// The effective permission set: the union of permissions across all
    /// assigned roles, derived on demand.
    pub fn effective_permissions(&self) -> HashSet<&Permission> {
        self.roles
            .iter()
            .flat_map(|r| r.permissions.iter())
            .collect()
    }

    /// Whether the actor holds any one of the listed permissions.
    pub fn holds_any(&self, required: &[Permission]) -> bool {
        let effective = self.effective_permissions();
        required.iter().any(|p| effective.contains(p))
    }

    /// Whether the actor holds any one of the listed role names.
    pub fn has_any_role(&self, required: &[RoleName]) -> bool {
        self.roles.iter().any(|r| required.contains(&r.name))
    }
}
