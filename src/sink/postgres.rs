//! PostgreSQL-backed log sink.

use async_trait::async_trait;
use sqlx::PgPool;

use super::LogSink;
use crate::domain::LogRecord;
use crate::error::GatewayError;

/// Append-only store for ingested entries, using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresLogStore {
    pool: PgPool,
}

impl PostgresLogStore {
    /// Creates a store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one entry to the `log_entries` table.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_entry(&self, record: &LogRecord) -> Result<i64, GatewayError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO log_entries (application_id, flight_id, entry, received_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&record.identity.application_id)
        .bind(&record.identity.flight_id)
        .bind(&record.entry)
        .bind(record.received_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(id)
    }
}

#[async_trait]
impl LogSink for PostgresLogStore {
    async fn accept(&self, record: LogRecord) {
        // The protocol is fire-and-forget; a failed insert never reaches
        // the client, only the server log.
        if let Err(err) = self.save_entry(&record).await {
            tracing::warn!(
                identity = %record.identity,
                error = %err,
                "failed to persist log entry"
            );
        }
    }
}
