//! Tower authentication middleware.
//!
//! `AuthLayer` and `AuthService` wrap any inner service with bearer-token
//! validation. Generic over [`ActorLoader`] — the middleware verifies the
//! token, then asks the loader for a freshly built `Actor` so that role
//! and activation changes take effect on the very next request.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{Request, StatusCode};
use tower::{Layer, Service};

use crate::{ActorLoader, AuthError, TokenService};

/// Tower `Layer` that wraps services with bearer-token authentication.
pub struct AuthLayer<L: ActorLoader> {
    loader: Arc<L>,
    tokens: Arc<TokenService>,
}

impl<L: ActorLoader> AuthLayer<L> {
    /// Create a new auth layer with the given loader and token service.
    pub fn new(loader: Arc<L>, tokens: Arc<TokenService>) -> Self {
        Self { loader, tokens }
    }
}

impl<L: ActorLoader> Clone for AuthLayer<L> {
    fn clone(&self) -> Self {
        Self {
            loader: self.loader.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<L: ActorLoader, S> Layer<S> for AuthLayer<L> {
    type Service = AuthService<L, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            loader: self.loader.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

/// Tower `Service` that validates bearer tokens before forwarding
/// requests.
///
/// On successful validation, inserts the loaded
/// [`Actor`](rapport_access::Actor) into request extensions where it is
/// available to downstream handlers.
pub struct AuthService<L: ActorLoader, S> {
    inner: S,
    loader: Arc<L>,
    tokens: Arc<TokenService>,
}

impl<L: ActorLoader, S: Clone> Clone for AuthService<L, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            loader: self.loader.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<L, S> Service<Request<Body>> for AuthService<L, S>
where
    L: ActorLoader,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let loader = self.loader.clone();
        let tokens = self.tokens.clone();

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req).map(str::to_string) else {
                return Ok(auth_error_response(&AuthError::MissingToken));
            };

            let user = match tokens.verify_access(&token) {
                Ok(user) => user,
                Err(err) => {
                    log::warn!("Token verification failed: {err}");
                    return Ok(auth_error_response(&err));
                }
            };

            match loader.load_actor(user).await {
                Ok(actor) => {
                    req.extensions_mut().insert(actor);
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Err(err) => {
                    log::warn!("Actor load failed for {user}: {err}");
                    Ok(auth_error_response(&err))
                }
            }
        })
    }
}

/// Extract the bearer token from the Authorization header.
fn extract_bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Build the JSON error response for a failed authentication.
fn auth_error_response(err: &AuthError) -> axum::response::Response {
    let status = if err.is_client_error() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let body = serde_json::json!({
        "success": false,
        "message": err.to_string(),
    });

    (
        status,
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response()
}
