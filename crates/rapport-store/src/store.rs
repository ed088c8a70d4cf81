//! The in-memory record store.
//!
//! One synchronized table set holds every record family. All access goes
//! through `&self` methods returning owned clones, so the store can be
//! shared behind an `Arc` across the server. The store also implements
//! [`Directory`] and [`ActorLoader`], the two seams the access and auth
//! layers need.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use rapport_access::{Actor, ActorRole, Directory, Permission, RoleName};
use rapport_auth::{ActorLoader, AuthError};
use rapport_core::types::{
    Activity, AuditLog, Contact, Deal, EmailLog, EmailTemplate, PermissionEntry, Role, Task, Team,
    TeamMember, User, Workflow,
};
use rapport_core::{Error, Result, TeamId, UserId};

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) roles: HashMap<Uuid, Role>,
    pub(crate) permissions: HashMap<Uuid, PermissionEntry>,
    pub(crate) contacts: HashMap<Uuid, Contact>,
    pub(crate) deals: HashMap<Uuid, Deal>,
    pub(crate) tasks: HashMap<Uuid, Task>,
    pub(crate) activities: Vec<Activity>,
    pub(crate) teams: HashMap<TeamId, Team>,
    pub(crate) team_members: Vec<TeamMember>,
    pub(crate) workflows: HashMap<Uuid, Workflow>,
    pub(crate) email_templates: HashMap<Uuid, EmailTemplate>,
    pub(crate) email_logs: Vec<EmailLog>,
    pub(crate) audit_logs: Vec<AuditLog>,
}

/// The record store. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct Store {
    pub(crate) tables: RwLock<Tables>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Inserts a user. Fails with a conflict if the email is taken.
    pub async fn insert_user(&self, user: User) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(Error::conflict("User with this email already exists"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Looks up a user by ID.
    pub async fn find_user(&self, id: UserId) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    /// Looks up a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    /// All users, newest first.
    pub async fn list_users(&self) -> Vec<User> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }

    /// Replaces a user's role assignment. Unknown role IDs are dropped,
    /// matching the original's set-only-found semantics.
    pub async fn set_user_roles(&self, id: UserId, role_ids: Vec<Uuid>) -> Result<User> {
        let mut tables = self.tables.write().await;
        let kept: Vec<Uuid> = role_ids
            .into_iter()
            .filter(|rid| tables.roles.contains_key(rid))
            .collect();
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("User", id))?;
        user.role_ids = kept;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    /// Stamps the user's last successful login.
    pub async fn touch_last_login(&self, id: UserId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("User", id))?;
        user.last_login = Some(Utc::now());
        Ok(())
    }

    /// The roles assigned to a user, resolved from its role IDs.
    pub async fn roles_of(&self, user: &User) -> Vec<Role> {
        let tables = self.tables.read().await;
        user.role_ids
            .iter()
            .filter_map(|rid| tables.roles.get(rid))
            .cloned()
            .collect()
    }

    // ========================================================================
    // Roles and permissions
    // ========================================================================

    /// Inserts a role. Fails with a conflict if the name is taken.
    pub async fn insert_role(&self, role: Role) -> Result<Role> {
        let mut tables = self.tables.write().await;
        if tables.roles.values().any(|r| r.name == role.name) {
            return Err(Error::conflict("Role with this name already exists"));
        }
        tables.roles.insert(role.id, role.clone());
        Ok(role)
    }

    /// Looks up a role by ID.
    pub async fn find_role(&self, id: Uuid) -> Option<Role> {
        self.tables.read().await.roles.get(&id).cloned()
    }

    /// Looks up a role by name.
    pub async fn find_role_by_name(&self, name: &str) -> Option<Role> {
        self.tables
            .read()
            .await
            .roles
            .values()
            .find(|r| r.name == name)
            .cloned()
    }

    /// All roles.
    pub async fn list_roles(&self) -> Vec<Role> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    /// Replaces a role's granted permissions. Unknown permission IDs are
    /// dropped.
    pub async fn set_role_permissions(&self, id: Uuid, permission_ids: Vec<Uuid>) -> Result<Role> {
        let mut tables = self.tables.write().await;
        let kept: Vec<Uuid> = permission_ids
            .into_iter()
            .filter(|pid| tables.permissions.contains_key(pid))
            .collect();
        let role = tables
            .roles
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Role", id))?;
        role.permission_ids = kept;
        role.updated_at = Utc::now();
        Ok(role.clone())
    }

    /// Inserts a permission catalog entry. Fails with a conflict if the
    /// token is taken.
    pub async fn insert_permission(&self, entry: PermissionEntry) -> Result<PermissionEntry> {
        let mut tables = self.tables.write().await;
        if tables.permissions.values().any(|p| p.name == entry.name) {
            return Err(Error::conflict("Permission with this name already exists"));
        }
        tables.permissions.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Looks up a permission by token.
    pub async fn find_permission_by_name(&self, name: &str) -> Option<PermissionEntry> {
        self.tables
            .read()
            .await
            .permissions
            .values()
            .find(|p| p.name == name)
            .cloned()
    }

    /// The whole permission catalog.
    pub async fn list_permissions(&self) -> Vec<PermissionEntry> {
        let tables = self.tables.read().await;
        let mut entries: Vec<PermissionEntry> = tables.permissions.values().cloned().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// The permission entries granted by a role.
    pub async fn permissions_of(&self, role: &Role) -> Vec<PermissionEntry> {
        let tables = self.tables.read().await;
        role.permission_ids
            .iter()
            .filter_map(|pid| tables.permissions.get(pid))
            .cloned()
            .collect()
    }

    // ========================================================================
    // Teams
    // ========================================================================

    /// Inserts a team.
    pub async fn insert_team(&self, team: Team) -> Result<Team> {
        let mut tables = self.tables.write().await;
        tables.teams.insert(team.id, team.clone());
        Ok(team)
    }

    /// All teams, name order.
    pub async fn list_teams(&self) -> Vec<Team> {
        let tables = self.tables.read().await;
        let mut teams: Vec<Team> = tables.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }

    /// Looks up a team by ID.
    pub async fn find_team(&self, id: TeamId) -> Option<Team> {
        self.tables.read().await.teams.get(&id).cloned()
    }

    /// Adds a user to a team (idempotent).
    pub async fn add_team_member(&self, member: TeamMember) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.teams.contains_key(&member.team_id) {
            return Err(Error::not_found("Team", member.team_id));
        }
        let already = tables
            .team_members
            .iter()
            .any(|m| m.team_id == member.team_id && m.user_id == member.user_id);
        if !already {
            tables.team_members.push(member);
        }
        Ok(())
    }

    /// Memberships of a team.
    pub async fn team_members(&self, team: TeamId) -> Vec<TeamMember> {
        self.tables
            .read()
            .await
            .team_members
            .iter()
            .filter(|m| m.team_id == team)
            .cloned()
            .collect()
    }

    // ========================================================================
    // Actor assembly
    // ========================================================================

    /// Builds the per-request actor for a user: current roles, current
    /// permissions, nothing cached.
    pub async fn build_actor(&self, user: &User) -> Actor {
        let tables = self.tables.read().await;
        let roles = user
            .role_ids
            .iter()
            .filter_map(|rid| tables.roles.get(rid))
            .map(|role| ActorRole {
                name: RoleName::new(role.name.clone()),
                permissions: role
                    .permission_ids
                    .iter()
                    .filter_map(|pid| tables.permissions.get(pid))
                    .filter_map(|entry| entry.name.parse::<Permission>().ok())
                    .collect(),
            })
            .collect();
        Actor::new(user.id, user.email.clone(), roles)
    }
}

#[async_trait]
impl Directory for Store {
    async fn teams_of(&self, user: UserId) -> Result<Vec<TeamId>> {
        Ok(self
            .tables
            .read()
            .await
            .team_members
            .iter()
            .filter(|m| m.user_id == user)
            .map(|m| m.team_id)
            .collect())
    }

    async fn manager_of(&self, user: UserId) -> Result<Option<UserId>> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(&user)
            .map(|u| u.manager_id)
            .ok_or_else(|| Error::not_found("User", user))
    }
}

impl ActorLoader for Store {
    fn load_actor(
        &self,
        user: UserId,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<Actor, AuthError>> + Send + '_>> {
        Box::pin(async move {
            let Some(record) = self.find_user(user).await else {
                return Err(AuthError::UserNotFound);
            };
            if !record.is_active {
                return Err(AuthError::Deactivated);
            }
            Ok(self.build_actor(&record).await)
        })
    }
}
