//! API error type and its wire mapping.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

use rapport_access::AccessError;
use rapport_auth::AuthError;

/// Errors surfaced to API clients.
///
/// Every variant renders as the `{"success": false, "message": ..}`
/// envelope with the status the original backend used: 401 for
/// authentication problems, 403 for denied checks, 404 for missing
/// records, 409 for uniqueness conflicts, 422 for invalid input, 500
/// otherwise.
#[derive(Debug)]
pub enum ApiError {
    /// 401 — no or invalid credentials.
    Unauthenticated(String),
    /// 403 — the actor failed an access check. Permission denials carry
    /// the required token list, role denials the required role list, as
    /// the original responses did.
    Forbidden {
        /// Denial message.
        message: String,
        /// Tokens that would have granted access.
        required_permissions: Option<Vec<String>>,
        /// Roles that would have granted access.
        required_roles: Option<Vec<String>>,
    },
    /// 404 — the record does not exist (or is not visible to the actor).
    NotFound(String),
    /// 409 — a uniqueness constraint was violated.
    Conflict(String),
    /// 422 — the request body or query failed validation.
    Validation(String),
    /// 500 — something inside the server went wrong. The message is
    /// logged, not leaked.
    Internal(String),
}

impl ApiError {
    /// 404 for a record kind, in the original's phrasing ("Contact not
    /// found").
    pub fn not_found(kind: &str) -> Self {
        ApiError::NotFound(format!("{kind} not found"))
    }

    /// 422 with a validation message.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        ApiError::Validation(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Forbidden {
                message,
                required_permissions,
                required_roles,
            } => {
                let mut body = json!({ "success": false, "message": message });
                if let Some(perms) = required_permissions {
                    body["required_permissions"] = json!(perms);
                }
                if let Some(roles) = required_roles {
                    body["required_roles"] = json!(roles);
                }
                body
            }
            ApiError::Internal(detail) => {
                log::error!("Internal error: {detail}");
                json!({ "success": false, "message": "Internal server error" })
            }
            ApiError::Unauthenticated(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::Validation(message) => {
                json!({ "success": false, "message": message })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match &err {
            AccessError::Unauthenticated => ApiError::Unauthenticated(err.to_string()),
            AccessError::MissingPermission
            | AccessError::MissingRole
            | AccessError::NotOwner => ApiError::Forbidden {
                message: err.to_string(),
                required_permissions: None,
                required_roles: None,
            },
            AccessError::NotFound => ApiError::NotFound(err.to_string()),
            AccessError::Directory(source) => ApiError::Internal(source.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_client_error() {
            ApiError::Unauthenticated(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<rapport_core::Error> for ApiError {
    fn from(err: rapport_core::Error) -> Self {
        use rapport_core::Error;
        match &err {
            Error::Validation { .. } => ApiError::Validation(err.to_string()),
            Error::NotFound { .. } => ApiError::NotFound(err.to_string()),
            Error::Conflict { message } => ApiError::Conflict(message.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}
