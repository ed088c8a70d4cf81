#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

//! # rapport-access
//!
//! Access control for the Rapport CRM:
//! - Permission and role value objects
//! - The per-request [`Actor`](policy::Actor)
//! - Decision checks (permission, role, ownership, team, manager)
//! - The [`Directory`](directory::Directory) lookup seam

pub mod directory;
pub mod enforcement;
pub mod error;
pub mod policy;

pub use directory::Directory;
pub use enforcement::{
    check_manager_access, check_ownership, check_permission, check_role, check_team_access,
};
pub use error::AccessError;
pub use policy::{Actor, ActorRole, Permission, RoleName, ADMIN_ROLE};
