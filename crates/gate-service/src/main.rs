//! Auth gateway binary.
//!
//! Wires configuration, the Postgres-backed user directory, metrics, and the
//! HTTP server together and serves until terminated.

use gate_service::config::Config;
use gate_service::repositories::users::PgUserDirectory;
use gate_service::routes::build_routes;
use gate_service::services::auth_gate::AuthGate;
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gate_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting auth gateway");

    let config = Config::from_env()?;

    PrometheusBuilder::new()
        .install()
        .map_err(|e| format!("Failed to install metrics exporter: {}", e))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    info!("Connected to user directory database");

    let directory = Arc::new(PgUserDirectory::new(pool));
    let gate = Arc::new(AuthGate::from_config(&config, directory)?);

    let app = build_routes(gate, &config.protected_prefix);

    let addr: SocketAddr = config.bind_address.parse()?;
    info!(%addr, prefix = %config.protected_prefix, "Auth gateway listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
