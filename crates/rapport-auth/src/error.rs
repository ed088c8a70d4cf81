//! Auth-specific error types.

/// Errors that can occur during authentication.
///
/// Display messages on the client-facing variants are part of the wire
/// contract and serialized verbatim into 401 responses.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("No token provided. Authorization header required.")]
    MissingToken,

    /// The token failed signature or format validation.
    #[error("Invalid token.")]
    InvalidToken,

    /// The token has expired.
    #[error("Token has expired. Please login again.")]
    Expired,

    /// The token's subject no longer exists.
    #[error("User not found. Invalid token.")]
    UserNotFound,

    /// The account behind the token has been deactivated.
    #[error("User account is deactivated.")]
    Deactivated,

    /// Password hashing failed (server-side).
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The store could not be reached while loading the actor.
    #[error("Internal server error during authentication.")]
    Store(#[source] rapport_core::Error),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidToken
                | AuthError::Expired
                | AuthError::UserNotFound
                | AuthError::Deactivated
        )
    }
}
