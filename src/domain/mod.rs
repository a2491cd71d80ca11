//! Domain layer: core types for authenticated telemetry ingestion.
//!
//! This module contains the server-side domain model: the client identity
//! established by the authentication handshake and the log record shape
//! handed to sinks.

pub mod identity;
pub mod log_record;

pub use identity::ClientIdentity;
pub use log_record::LogRecord;
