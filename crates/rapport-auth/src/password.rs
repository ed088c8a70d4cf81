//! Password hashing and verification.

use crate::AuthError;

/// Hashes a plaintext password with bcrypt at the given cost.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(plain, cost).map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verifies a plaintext password against a stored bcrypt hash.
///
/// Malformed hashes verify as false rather than erroring; a login attempt
/// against a corrupt record should fail closed, not 500.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
