//! Relationship lookups needed by the team and manager access variants.

use async_trait::async_trait;

use rapport_core::{Result, TeamId, UserId};

/// Async lookups into the user/team directory.
///
/// The team-access check needs the team memberships of two users; the
/// manager-access check needs one user's manager. Implemented by the
/// store; test code can implement it over fixed maps.
#[async_trait]
pub trait Directory: Send + Sync {
    /// The teams `user` belongs to.
    async fn teams_of(&self, user: UserId) -> Result<Vec<TeamId>>;

    /// The manager of `user`, if one is assigned.
    ///
    /// Returns an error if `user` itself is unknown.
    async fn manager_of(&self, user: UserId) -> Result<Option<UserId>>;
}
