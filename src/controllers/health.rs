use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once the sounds root is reachable
pub async fn health_ready(State(sounds_dir): State<Arc<PathBuf>>) -> impl IntoResponse {
    match tokio::fs::metadata(sounds_dir.as_path()).await {
        Ok(meta) if meta.is_dir() => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "storage": "available",
                "tts": "available"
            })),
        ),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "storage": "unavailable",
                "tts": "unknown"
            })),
        ),
    }
}
