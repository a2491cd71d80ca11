//! The unit of ingestion handed to sinks.

use chrono::{DateTime, Utc};

use super::ClientIdentity;

/// One authenticated telemetry entry, ready for a sink.
///
/// The `entry` value is forwarded verbatim from the client's
/// `payload.data` array; the gateway attaches the session identity and a
/// server-side receive timestamp but never inspects the entry itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Identity of the session that produced the entry.
    pub identity: ClientIdentity,
    /// The opaque JSON entry as received.
    pub entry: serde_json::Value,
    /// Server-side timestamp at which the entry was accepted.
    pub received_at: DateTime<Utc>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(identity: ClientIdentity, entry: serde_json::Value) -> Self {
        Self {
            identity,
            entry,
            received_at: Utc::now(),
        }
    }
}
