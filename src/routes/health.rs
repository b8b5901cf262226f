use axum::{http::StatusCode, response::Json};
use serde_json::json;

pub async fn healthz() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "service is healthy" })),
    )
}

pub async fn readyz() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ready", "message": "service is ready" })),
    )
}
