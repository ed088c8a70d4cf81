//! HS256 JWT issuing and verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use rapport_core::config::AuthSettings;
use rapport_core::UserId;

use crate::AuthError;

/// Marker carried by refresh tokens in the `typ` claim.
const REFRESH_TYPE: &str = "refresh";

/// Claims carried by Rapport JWTs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Token type; `Some("refresh")` on refresh tokens, absent on access
    /// tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// Whether these are refresh-token claims.
    pub fn is_refresh(&self) -> bool {
        self.typ.as_deref() == Some(REFRESH_TYPE)
    }
}

/// Issues and verifies the backend's bearer tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenService {
    /// Builds a token service from the auth settings.
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
            access_ttl_secs: settings.access_token_ttl_secs,
            refresh_ttl_secs: settings.refresh_token_ttl_secs,
        }
    }

    /// Issues an access token for `user`.
    pub fn issue_access(&self, user: UserId) -> Result<String, AuthError> {
        self.issue(user, None, self.access_ttl_secs)
    }

    /// Issues a refresh token for `user`.
    pub fn issue_refresh(&self, user: UserId) -> Result<String, AuthError> {
        self.issue(user, Some(REFRESH_TYPE.to_string()), self.refresh_ttl_secs)
    }

    fn issue(&self, user: UserId, typ: Option<String>, ttl_secs: u64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user,
            typ,
            iat: now,
            exp: now + ttl_secs as i64,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verifies any Rapport token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            }
        })?;
        Ok(data.claims)
    }

    /// Verifies an access token and returns the user it names.
    ///
    /// Refresh tokens are not valid for API access.
    pub fn verify_access(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.verify(token)?;
        if claims.is_refresh() {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims.sub)
    }
}
