//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::protocol::SessionConfig;
use crate::sink::GatewaySink;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Destination for authenticated log entries.
    pub sink: GatewaySink,
    /// Protocol settings applied to every session.
    pub session_config: Arc<SessionConfig>,
}
