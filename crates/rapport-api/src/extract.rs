//! Request extractors.

use axum::extract::FromRequestParts;
use http::request::Parts;
use std::convert::Infallible;

use rapport_access::Actor;

/// Extracts the [`Actor`] the auth middleware stored in request
/// extensions.
///
/// Carries an `Option` rather than rejecting: the access checks
/// themselves turn an absent actor into the 401, keeping the decision
/// logic in one place.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Option<Actor>);

impl CurrentActor {
    /// The actor, if the request was authenticated.
    pub fn actor(&self) -> Option<&Actor> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentActor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Actor>().cloned()))
    }
}
