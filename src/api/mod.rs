//! REST API layer: the system endpoints around the WebSocket core.

pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the REST router.
pub fn build_router() -> Router<AppState> {
    handlers::system::routes()
}
