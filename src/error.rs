//! Gateway error types.
//!
//! [`GatewayError`] covers startup and persistence failures;
//! [`SessionError`] covers per-frame protocol failures inside a
//! WebSocket session. Session errors are scoped to a single frame or a
//! single connection and never affect other sessions.

/// Server-side error enum for startup and persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),
}

/// Per-frame protocol failure inside one WebSocket session.
///
/// # Fatality
///
/// | Variant                | Effect on the session            |
/// |------------------------|----------------------------------|
/// | `MalformedMessage`     | frame dropped, session continues |
/// | `AuthDecode`           | transport closed                 |
/// | `CredentialsRejected`  | transport closed                 |
/// | `Transport`            | transport assumed gone           |
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The inbound frame was not parseable as a protocol message.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),

    /// The `authString` blob failed to base64-decode or JSON-parse.
    ///
    /// No authenticated state is reachable from corrupt credentials, so
    /// this closes the connection.
    #[error("auth string could not be decoded: {0}")]
    AuthDecode(String),

    /// The injected credential validator rejected the identity.
    #[error("credentials rejected for {0}")]
    CredentialsRejected(String),

    /// The transport failed to deliver an outbound message.
    #[error("transport send failed: {0}")]
    Transport(String),
}

impl SessionError {
    /// Returns `true` if this error terminates the session.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::MalformedMessage(_) => false,
            Self::AuthDecode(_) | Self::CredentialsRejected(_) | Self::Transport(_) => true,
        }
    }
}
