//! Liveness endpoints.

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// `GET /health`
pub async fn server_health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// `GET /api/v1/health`
pub async fn api_health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is running",
        "version": "v1",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
