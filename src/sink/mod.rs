//! Sinks for authenticated log entries.
//!
//! The session hands every accepted entry to a [`LogSink`] and moves on;
//! durability and error signaling are the sink's problem. The gateway
//! ships two: [`PostgresLogStore`] for durable storage and [`NullSink`]
//! for running without a database.

pub mod postgres;

use async_trait::async_trait;

use crate::domain::LogRecord;

pub use postgres::PostgresLogStore;

/// Consumer of authenticated log entries.
///
/// Fire-and-forget: `accept` has no return value and must not fail the
/// calling session.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Takes ownership of one accepted entry.
    async fn accept(&self, record: LogRecord);
}

/// Sink that discards entries after a debug log line.
///
/// Used when persistence is disabled; keeps the ingestion path hot
/// without any storage behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl LogSink for NullSink {
    async fn accept(&self, record: LogRecord) {
        tracing::debug!(identity = %record.identity, "discarding entry (persistence disabled)");
    }
}

/// The sink variant selected at startup from configuration.
#[derive(Debug, Clone)]
pub enum GatewaySink {
    /// Discard everything.
    Null(NullSink),
    /// Append to the `log_entries` table.
    Postgres(PostgresLogStore),
}

#[async_trait]
impl LogSink for GatewaySink {
    async fn accept(&self, record: LogRecord) {
        match self {
            Self::Null(sink) => sink.accept(record).await,
            Self::Postgres(sink) => sink.accept(record).await,
        }
    }
}
