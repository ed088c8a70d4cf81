//! Error types for the Rapport workspace.

use thiserror::Error;

/// Result type alias for Rapport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Rapport backend.
///
/// Marked `#[non_exhaustive]` so new variants can be added without
/// breaking downstream crates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Input failed validation before reaching the store.
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A record lookup came back empty.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind, e.g. "User" or "Role"
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("Conflict: {message}")]
    Conflict {
        /// Which constraint was violated
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (config files, sockets)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new not-found error.
    pub fn not_found<S: std::fmt::Display>(kind: &'static str, id: S) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates a new conflict error.
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Error::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Whether this error was caused by the caller's input rather than
    /// the server (maps to a 4xx status at the API layer).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::NotFound { .. } | Error::Conflict { .. }
        )
    }
}
