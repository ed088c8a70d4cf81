//! Shared application state.

use std::sync::Arc;

use rapport_auth::TokenService;
use rapport_core::RapportConfig;
use rapport_store::Store;

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The record store.
    pub store: Arc<Store>,
    /// JWT issuing and verification.
    pub tokens: Arc<TokenService>,
    /// Server configuration.
    pub config: Arc<RapportConfig>,
}

impl AppState {
    /// Builds the application state from a configuration.
    pub fn new(store: Arc<Store>, config: RapportConfig) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth));
        Self {
            store,
            tokens,
            config: Arc::new(config),
        }
    }
}
