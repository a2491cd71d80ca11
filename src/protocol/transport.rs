//! Outbound side of the bidirectional channel, as seen by the session.

use async_trait::async_trait;

use super::messages::ServerMessage;
use crate::error::SessionError;

/// Close code sent when the client declares a different protocol version.
pub const CLOSE_VERSION_MISMATCH: u16 = 4001;
/// Close code sent when the credential blob is undecodable or rejected.
pub const CLOSE_BAD_CREDENTIALS: u16 = 4002;
/// Close code sent when an unauthenticated session outlives the handshake
/// deadline.
pub const CLOSE_HANDSHAKE_TIMEOUT: u16 = 4003;

/// Write half of a connection, owned by its [`super::ConnectionSession`].
///
/// Implementations must not block: the axum adapter awaits the socket
/// write half, and the mock used in tests records messages in memory.
#[async_trait]
pub trait Transport: Send {
    /// Serializes and delivers one outbound message.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] if the peer is gone. Callers
    /// sending best-effort notices may ignore the error.
    async fn send(&mut self, message: &ServerMessage) -> Result<(), SessionError>;

    /// Closes the connection with the given close code. Infallible by
    /// design: a close that races a peer disconnect is still a close.
    async fn close(&mut self, code: u16);
}
