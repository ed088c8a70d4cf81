//! Router assembly and the HTTP server entry point.

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Router};

use rapport_auth::AuthLayer;
use rapport_core::{RapportConfig, Result};
use rapport_store::{seed, Store};

use crate::routes::{
    activities, audit_logs, auth, contacts, deals, emails, health, roles, tasks, teams, users,
    workflows,
};
use crate::{audit, AppState};

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let auth_layer = AuthLayer::new(state.store.clone(), state.tokens.clone());
    let audit_layer = middleware::from_fn_with_state(state.clone(), audit::record_audit);

    // Login and registration need no token but are still audited.
    let public = Router::new()
        .nest("/auth", auth::public_router())
        .layer(audit_layer.clone());

    // Everything else sits behind the auth layer; the audit layer runs
    // inside it so recorded entries carry the acting user.
    let protected = Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/users", users::router())
        .nest("/roles", roles::router())
        .nest("/contacts", contacts::router())
        .nest("/deals", deals::router())
        .nest("/tasks", tasks::router())
        .nest("/activities", activities::router())
        .nest("/teams", teams::router())
        .nest("/workflows", workflows::router())
        .nest("/emails", emails::router())
        .nest("/audit", audit_logs::router())
        .layer(audit_layer)
        .layer(auth_layer);

    let api = Router::new()
        .route("/health", get(health::api_health))
        .merge(public)
        .merge(protected);

    Router::new()
        .route("/health", get(health::server_health))
        .nest("/api/v1", api)
        .with_state(state)
}

/// Seeds the store and serves the API until the process is stopped.
pub async fn serve(config: RapportConfig) -> Result<()> {
    let store = Arc::new(Store::new());
    seed::seed(&store, config.auth.bcrypt_cost).await?;

    let bind = config.server.bind.clone();
    let state = AppState::new(store, config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("Rapport API listening on {bind}");
    axum::serve(listener, router).await?;
    Ok(())
}
