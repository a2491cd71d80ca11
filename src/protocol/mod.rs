//! The per-connection protocol core: wire messages, capability traits,
//! and the [`ConnectionSession`] state machine.
//!
//! Everything in this module is transport-agnostic. The session consumes
//! a [`Transport`] for outbound delivery, a
//! [`crate::sink::LogSink`] for accepted entries, and a
//! [`CredentialValidator`] for the authorization decision; the axum
//! WebSocket wiring lives in [`crate::ws`].

pub mod auth;
pub mod messages;
pub mod session;
pub mod transport;

pub use auth::{AllowAll, CredentialValidator};
pub use messages::{ClientMessage, ClientMessageType, ServerMessage};
pub use session::{ConnectionSession, SessionConfig, SessionState};
pub use transport::Transport;
