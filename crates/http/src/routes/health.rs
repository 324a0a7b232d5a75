//! Health check handler

use crate::types::HealthResponse;
use axum::response::Json;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
