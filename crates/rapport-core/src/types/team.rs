//! Teams and team membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{TeamId, UserId};

/// A team of users, optionally managed and optionally nested under a
/// parent team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Primary key.
    pub id: TeamId,
    /// Team name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Managing user, if any.
    #[serde(default)]
    pub manager_id: Option<UserId>,
    /// Parent team for hierarchical structures.
    #[serde(default)]
    pub parent_team_id: Option<TeamId>,
    /// Inactive teams are hidden from listings.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a team.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTeam {
    /// Team name (required).
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Managing user.
    #[serde(default)]
    pub manager_id: Option<UserId>,
    /// Parent team.
    #[serde(default)]
    pub parent_team_id: Option<TeamId>,
}

/// Membership of one user in one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// The team.
    pub team_id: TeamId,
    /// The member.
    pub user_id: UserId,
    /// Member role within the team: "member", "lead" or "manager".
    pub role: String,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}

impl Team {
    /// Builds a team from a creation payload.
    pub fn from_new(new: NewTeam) -> Self {
        let now = Utc::now();
        Self {
            id: TeamId::new(),
            name: new.name,
            description: new.description,
            manager_id: new.manager_id,
            parent_team_id: new.parent_team_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TeamMember {
    /// Adds `user` to `team` with the default "member" role.
    pub fn new(team: TeamId, user: UserId) -> Self {
        Self {
            team_id: team,
            user_id: user,
            role: "member".to_string(),
            joined_at: Utc::now(),
        }
    }
}
