//! Wire message types for the logger protocol.
//!
//! All field names follow the JavaScript client's camelCase convention.
//! Inbound messages carry a `messageType` discriminator and an optional
//! `loggerVersion`; outbound messages are either a `state` reply or the
//! final disconnect notice.

use serde::{Deserialize, Serialize};

/// Protocol error code for a client/server version mismatch.
pub const ERROR_VERSION_MISMATCH: u32 = 1;
/// Protocol error code for a duplicate authenticate attempt.
pub const ERROR_ALREADY_AUTHENTICATED: u32 = 2;

/// An inbound frame after JSON parsing.
///
/// `messageType` is mandatory; anything that fails to parse into this
/// shape is treated as a malformed frame and dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    /// Discriminator selecting the handler for this frame.
    pub message_type: ClientMessageType,
    /// Protocol version the client was built against, if declared.
    pub logger_version: Option<String>,
    /// Base64 credential blob, present on authenticate messages.
    pub auth_string: Option<String>,
    /// Entry batch, present on data messages.
    pub payload: Option<DataPayload>,
}

/// Known inbound message types.
///
/// Unrecognized values map to [`ClientMessageType::Unknown`] so that
/// newer clients do not break older gateways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessageType {
    /// Handshake carrying the credential blob.
    Authenticate,
    /// A batch of telemetry entries.
    Data,
    /// Any message type this gateway does not understand.
    #[serde(other)]
    Unknown,
}

/// The `payload` object of a data message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPayload {
    /// Ordered entries, forwarded verbatim to the sink.
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    /// Client-reported batch length. Informational only.
    #[serde(default)]
    pub length: Option<usize>,
}

/// An outbound frame.
///
/// Serializes untagged to one of the protocol's reply shapes:
/// `{"state": ...}` or `{"disconnect": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    /// Handshake result or protocol error.
    State(StateReply),
    /// Final notice sent when the session ends.
    Disconnect(DisconnectNotice),
}

impl ServerMessage {
    /// The reply confirming a successful handshake.
    #[must_use]
    pub const fn handshake_approved() -> Self {
        Self::State(StateReply {
            state: ReplyState::HandshakeApproved,
            error_code: None,
            error_message: None,
        })
    }

    /// An error reply with the given protocol error code.
    #[must_use]
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self::State(StateReply {
            state: ReplyState::Error,
            error_code: Some(code),
            error_message: Some(message.into()),
        })
    }

    /// The `{"disconnect": true}` notice.
    #[must_use]
    pub const fn disconnect() -> Self {
        Self::Disconnect(DisconnectNotice { disconnect: true })
    }
}

/// Body of a `state` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateReply {
    /// Outcome discriminator the client switches on.
    pub state: ReplyState,
    /// Numeric error code, present on error replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u32>,
    /// Human-readable error message, present on error replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Values of the `state` field in outbound replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplyState {
    /// The handshake was accepted; data messages may follow.
    HandshakeApproved,
    /// A protocol error; see `errorCode`.
    Error,
}

/// Body of the final disconnect notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisconnectNotice {
    /// Always `true`.
    pub disconnect: bool,
}
