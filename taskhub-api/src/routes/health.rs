/// Health check endpoint
///
/// `GET /health` - public liveness probe.

use axum::Json;
use serde_json::{json, Value};

/// Returns a static OK payload with the server version
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
