//! Per-connection protocol state machine.
//!
//! One [`ConnectionSession`] exists per accepted connection and is owned
//! by a single task, so no locking happens here: frames are handled
//! strictly in arrival order and the session never sleeps. The lifecycle
//! is `Connected` → `Authenticated` → `Closed`, with a direct jump to
//! `Closed` on a version mismatch or a credential failure.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::auth::{CredentialValidator, decode_auth_string};
use super::messages::{
    ClientMessage, ClientMessageType, ERROR_ALREADY_AUTHENTICATED, ERROR_VERSION_MISMATCH,
    ServerMessage,
};
use super::transport::{
    CLOSE_BAD_CREDENTIALS, CLOSE_HANDSHAKE_TIMEOUT, CLOSE_VERSION_MISMATCH, Transport,
};
use crate::domain::{ClientIdentity, LogRecord};
use crate::error::SessionError;
use crate::sink::LogSink;

/// Per-session protocol settings, shared across all connections.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Protocol version this gateway speaks. Compared against the
    /// `loggerVersion` a client declares on each frame.
    pub protocol_version: String,
    /// Log dropped frames (unauthenticated data, unknown types) at warn
    /// instead of silently discarding them.
    pub warn_on_dropped: bool,
    /// If set, unauthenticated sessions are closed after this long.
    pub handshake_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            protocol_version: "0.2".to_string(),
            warn_on_dropped: false,
            handshake_timeout: None,
        }
    }
}

/// Lifecycle of a session.
///
/// The identity lives inside the `Authenticated` variant, so "identity
/// populated iff authenticated" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, handshake not yet completed.
    Connected,
    /// Handshake completed; data messages are accepted.
    Authenticated(ClientIdentity),
    /// Terminal. No further frames are processed.
    Closed,
}

/// State machine for one connection.
///
/// Owns the write half of the transport, the sink for accepted entries,
/// and the credential validator. The read loop in
/// [`crate::ws::connection`] feeds frames in via
/// [`handle_frame`](Self::handle_frame) and finishes with
/// [`handle_disconnect`](Self::handle_disconnect).
#[derive(Debug)]
pub struct ConnectionSession<T, S, V> {
    transport: T,
    sink: S,
    validator: V,
    config: Arc<SessionConfig>,
    connected_at: DateTime<Utc>,
    state: SessionState,
}

impl<T, S, V> ConnectionSession<T, S, V>
where
    T: Transport,
    S: LogSink,
    V: CredentialValidator,
{
    /// Creates a session for a freshly accepted connection, recording
    /// the connect timestamp.
    #[must_use]
    pub fn new(transport: T, sink: S, validator: V, config: Arc<SessionConfig>) -> Self {
        let connected_at = Utc::now();
        tracing::debug!(%connected_at, "session opened");
        Self {
            transport,
            sink,
            validator,
            config,
            connected_at,
            state: SessionState::Connected,
        }
    }

    /// Timestamp at which the connection was accepted.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The authenticated identity, if the handshake has completed.
    #[must_use]
    pub const fn identity(&self) -> Option<&ClientIdentity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Connected | SessionState::Closed => None,
        }
    }

    /// Whether the handshake has completed.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Whether the session has reached its terminal state.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    /// Processes one inbound frame.
    ///
    /// Frames must be delivered in arrival order; the caller owns the
    /// session so overlap is impossible. Frames arriving after the
    /// session closed are ignored.
    ///
    /// # Errors
    ///
    /// [`SessionError::MalformedMessage`] if the frame is not a protocol
    /// message (the frame is dropped, the session stays open), or a
    /// fatal error after the session closed itself on bad credentials.
    pub async fn handle_frame(&mut self, raw: &str) -> Result<(), SessionError> {
        if self.is_closed() {
            return Ok(());
        }

        let message: ClientMessage = serde_json::from_str(raw)?;

        if let Some(declared) = message.logger_version.as_deref()
            && declared != self.config.protocol_version
        {
            return self.reject_version(declared).await;
        }

        match message.message_type {
            ClientMessageType::Authenticate => self.handle_authenticate(&message).await,
            ClientMessageType::Data => self.handle_data(message).await,
            ClientMessageType::Unknown => {
                self.note_dropped("unknown message type");
                Ok(())
            }
        }
    }

    /// Ends the session: best-effort `{"disconnect": true}` notice, then
    /// the terminal state. The read loop calls this exactly once, after
    /// the peer went away or the session closed itself.
    pub async fn handle_disconnect(&mut self) {
        if self.transport.send(&ServerMessage::disconnect()).await.is_err() {
            tracing::debug!("peer gone before disconnect notice");
        }
        self.state = SessionState::Closed;
        tracing::debug!("session closed");
    }

    /// Closes an unauthenticated session whose handshake deadline
    /// elapsed. No-op once authenticated.
    pub async fn expire_handshake(&mut self) {
        if self.is_authenticated() || self.is_closed() {
            return;
        }
        tracing::info!(
            timeout = ?self.config.handshake_timeout,
            "handshake deadline elapsed; closing session"
        );
        self.transport.close(CLOSE_HANDSHAKE_TIMEOUT).await;
        self.state = SessionState::Closed;
    }

    async fn reject_version(&mut self, declared: &str) -> Result<(), SessionError> {
        let expected = &self.config.protocol_version;
        tracing::info!(declared, expected, "protocol version mismatch; closing session");
        let reply =
            ServerMessage::error(ERROR_VERSION_MISMATCH, format!("Expected version {expected}"));
        if self.transport.send(&reply).await.is_err() {
            tracing::debug!("peer gone before version-mismatch reply");
        }
        self.transport.close(CLOSE_VERSION_MISMATCH).await;
        self.state = SessionState::Closed;
        Ok(())
    }

    async fn handle_authenticate(&mut self, message: &ClientMessage) -> Result<(), SessionError> {
        if self.is_authenticated() {
            // Idempotent rejection: identity never changes once set.
            let reply = ServerMessage::error(
                ERROR_ALREADY_AUTHENTICATED,
                "Already authenticated; ignoring request",
            );
            self.transport.send(&reply).await?;
            return Ok(());
        }

        let blob = message.auth_string.as_deref().unwrap_or_default();
        let identity = match decode_auth_string(blob) {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(error = %err, "undecodable credentials; closing session");
                self.transport.close(CLOSE_BAD_CREDENTIALS).await;
                self.state = SessionState::Closed;
                return Err(err);
            }
        };

        if !self.validator.validate(&identity).await {
            tracing::warn!(%identity, "credentials rejected; closing session");
            self.transport.close(CLOSE_BAD_CREDENTIALS).await;
            self.state = SessionState::Closed;
            return Err(SessionError::CredentialsRejected(identity.to_string()));
        }

        tracing::info!(%identity, "handshake approved");
        self.state = SessionState::Authenticated(identity);
        self.transport.send(&ServerMessage::handshake_approved()).await?;
        Ok(())
    }

    async fn handle_data(&mut self, message: ClientMessage) -> Result<(), SessionError> {
        let SessionState::Authenticated(identity) = &self.state else {
            self.note_dropped("data before authentication");
            return Ok(());
        };

        let payload = message.payload.unwrap_or_default();
        if let Some(declared) = payload.length
            && declared != payload.data.len()
        {
            tracing::debug!(
                declared,
                actual = payload.data.len(),
                "batch length field disagrees with entry count"
            );
        }

        for entry in payload.data {
            self.sink.accept(LogRecord::new(identity.clone(), entry)).await;
        }
        Ok(())
    }

    fn note_dropped(&self, reason: &str) {
        if self.config.warn_on_dropped {
            tracing::warn!(reason, "dropping frame");
        } else {
            tracing::debug!(reason, "dropping frame");
        }
    }
}
