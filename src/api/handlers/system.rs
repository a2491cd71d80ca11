//! System endpoints: health check and protocol info.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Protocol info response.
#[derive(Debug, Serialize, ToSchema)]
struct ProtocolInfo {
    protocol_version: String,
    endpoint: &'static str,
}

/// `GET /config/protocol` — Protocol version clients must declare.
#[utoipa::path(
    get,
    path = "/config/protocol",
    tag = "System",
    summary = "Logger protocol info",
    description = "Returns the logger protocol version this gateway expects and the WebSocket endpoint path.",
    responses(
        (status = 200, description = "Protocol info", body = ProtocolInfo),
    )
)]
pub async fn protocol_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ProtocolInfo {
            protocol_version: state.session_config.protocol_version.clone(),
            endpoint: "/ws/logger",
        }),
    )
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/protocol", get(protocol_handler))
}
