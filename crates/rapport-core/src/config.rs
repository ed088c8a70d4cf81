//! Server configuration.
//!
//! Loaded from a TOML file with environment-variable overrides for the
//! values that differ per deployment (bind address, JWT secret). Every
//! field has a default so a bare `rapport serve` works out of the box.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "RAPPORT_CONFIG";
/// Environment variable overriding the bind address.
pub const BIND_ENV: &str = "RAPPORT_BIND";
/// Environment variable overriding the JWT secret.
pub const JWT_SECRET_ENV: &str = "RAPPORT_JWT_SECRET";

/// Top-level configuration for the Rapport server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RapportConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "127.0.0.1:8080".
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret for signing JWTs.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in seconds (24h by default).
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds (7 days by default).
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,
    /// bcrypt cost factor for password hashing.
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_jwt_secret() -> String {
    // Dev-only fallback; deployments must set RAPPORT_JWT_SECRET.
    "rapport-dev-secret".to_string()
}

fn default_access_ttl() -> u64 {
    24 * 60 * 60
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_bcrypt_cost() -> u32 {
    10
}

impl RapportConfig {
    /// Loads configuration.
    ///
    /// Resolution order: an explicit `path` argument (must exist), else the
    /// file named by `RAPPORT_CONFIG` (must exist), else `./rapport.toml`
    /// if present, else built-in defaults. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_path(path) {
            Some((path, required)) => {
                if path.exists() {
                    Self::from_file(&path)?
                } else if required {
                    return Err(Error::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                } else {
                    Self::default()
                }
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    fn resolve_path(path: Option<&str>) -> Option<(std::path::PathBuf, bool)> {
        if let Some(p) = path {
            return Some((std::path::PathBuf::from(p), true));
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return Some((std::path::PathBuf::from(p), true));
        }
        Some((std::path::PathBuf::from("rapport.toml"), false))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(bind) = std::env::var(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            self.auth.jwt_secret = secret;
        }
    }
}
