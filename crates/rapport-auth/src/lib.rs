//! Authentication primitives for Rapport.
//!
//! Provides:
//! - [`TokenService`] — HS256 access/refresh JWT issuing and verification
//! - [`password`] — bcrypt hashing and verification
//! - [`ActorLoader`] — trait for rebuilding the request [`Actor`] from storage
//! - [`AuthLayer`] / [`AuthService`] — Tower middleware parameterised over
//!   `ActorLoader`
//! - [`AuthError`] — auth-specific error types

mod error;
mod middleware;
pub mod password;
mod token;

pub use error::AuthError;
pub use middleware::{AuthLayer, AuthService};
pub use token::{Claims, TokenService};

use rapport_access::Actor;
use rapport_core::UserId;

/// Trait for loading the actor behind a validated token.
///
/// The middleware calls `load_actor` with the token's subject on every
/// request. Implementations must rebuild the actor from the *current*
/// user record and role assignment — never from a cache — so role changes
/// and deactivations take effect on the next request. Unknown users and
/// deactivated accounts are rejected here.
pub trait ActorLoader: Send + Sync + 'static {
    /// Load the actor for `user`, or explain why the token is no longer
    /// acceptable.
    fn load_actor(
        &self,
        user: UserId,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Actor, AuthError>> + Send + '_>>;
}
