//! Identity established by the authentication handshake.

use serde::{Deserialize, Serialize};

/// The application/flight pair a client authenticates as.
///
/// Decoded from the base64 `authString` blob during the handshake and
/// immutable for the rest of the session. Both fields are opaque
/// identifiers assigned by whoever provisioned the logging client; the
/// gateway never interprets them beyond attaching them to ingested
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Identifier of the emitting application.
    #[serde(rename = "appID")]
    pub application_id: String,
    /// Identifier of the flight (logging run) this session belongs to.
    #[serde(rename = "flightID")]
    pub flight_id: String,
}

impl ClientIdentity {
    /// Creates an identity from its two opaque parts.
    #[must_use]
    pub fn new(application_id: impl Into<String>, flight_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            flight_id: flight_id.into(),
        }
    }
}

impl std::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.application_id, self.flight_id)
    }
}
