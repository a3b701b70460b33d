// GET / and GET /healthz: liveness endpoints for the host platform.

use axum::response::IntoResponse;
use axum::Json;

pub async fn index() -> &'static str {
    "Hello SP-Fashion!"
}

/// Health check: always returns 200 OK.
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
