//! # flightlog-gateway
//!
//! WebSocket ingestion gateway for streamed flight telemetry logs.
//!
//! Logging clients open a persistent WebSocket, complete a versioned
//! handshake (`authenticate` with a base64 credential blob), then stream
//! `data` messages whose entries are forwarded to a pluggable sink. All
//! protocol behavior lives in the per-connection state machine in
//! [`protocol`]; transport and persistence are replaceable edges.
//!
//! ## Architecture
//!
//! ```text
//! Logging clients (WebSocket)
//!     │
//!     ├── WS upgrade + read loop (ws/)
//!     │
//!     ├── ConnectionSession state machine (protocol/)
//!     │       version check → authenticate → data dispatch
//!     │
//!     ├── LogSink (sink/)
//!     │       NullSink | PostgresLogStore
//!     │
//!     └── REST surface: /health, /config/protocol (api/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod sink;
pub mod ws;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Composes the full application router: REST surface plus the
/// `/ws/logger` WebSocket endpoint.
#[must_use]
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws/logger", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
