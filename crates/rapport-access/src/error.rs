//! Access decision outcomes that deny the request.

use http::StatusCode;
use thiserror::Error;

/// A denied access decision, or a failed directory lookup while deciding.
///
/// The message on each denial variant is part of the wire contract: route
/// handlers serialize it verbatim into the response envelope.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No authenticated actor on the request.
    #[error("Authentication required.")]
    Unauthenticated,

    /// The actor holds none of the required permissions.
    #[error("You do not have permission to perform this action.")]
    MissingPermission,

    /// The actor holds none of the required roles.
    #[error("You do not have the required role to perform this action.")]
    MissingRole,

    /// The actor is not the owner of the target record (nor granted
    /// access through a team or manager relationship).
    #[error("You do not have permission to access this resource.")]
    NotOwner,

    /// The target record was not loaded. Deliberately reported instead of
    /// a forbidden so denials never reveal whether a record exists under
    /// a different owner.
    #[error("Resource not found.")]
    NotFound,

    /// A team or manager lookup failed. Infrastructure, not a decision.
    #[error("Access lookup failed: {0}")]
    Directory(#[source] rapport_core::Error),
}

impl AccessError {
    /// The HTTP status this outcome maps to at the route layer.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::MissingPermission | AccessError::MissingRole | AccessError::NotOwner => {
                StatusCode::FORBIDDEN
            }
            AccessError::NotFound => StatusCode::NOT_FOUND,
            AccessError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is a forbidden decision (actor present, check failed).
    pub fn is_forbidden(&self) -> bool {
        self.status_code() == StatusCode::FORBIDDEN
    }
}
