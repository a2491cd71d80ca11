//! flightlog-gateway server entry point.
//!
//! Starts the Axum HTTP server with the logger WebSocket endpoint and
//! the system REST routes.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use flightlog_gateway::app_state::AppState;
use flightlog_gateway::build_app;
use flightlog_gateway::config::GatewayConfig;
use flightlog_gateway::sink::{GatewaySink, NullSink, PostgresLogStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting flightlog-gateway");

    // Select the sink
    let sink = if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("persistence enabled; entries go to log_entries");
        GatewaySink::Postgres(PostgresLogStore::new(pool))
    } else {
        tracing::info!("persistence disabled; entries are discarded");
        GatewaySink::Null(NullSink)
    };

    // Build application state
    let app_state = AppState {
        sink,
        session_config: config.session_config(),
    };

    let app = build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
