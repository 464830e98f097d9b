//! xa-gateway server entry point.
//!
//! Provisions both datastores, then starts the Axum HTTP server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use xa_gateway::api;
use xa_gateway::app_state::AppState;
use xa_gateway::config::GatewayConfig;
use xa_gateway::persistence::{self, PoolSettings};
use xa_gateway::service::PetService;
use xa_gateway::xa::{TransactionManager, XaDataSource};

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
    tracing::info!(addr = %config.listen_addr, "starting xa-gateway");

    // Provision datastores before anything can reach them
    let settings = PoolSettings {
        max_connections: config.database_max_connections,
        acquire_timeout: Duration::from_secs(config.database_connect_timeout_secs),
    };
    let a = persistence::provision("a", &config.datastore_a_url, &config.seed_dir, &settings)
        .await
        .context("provisioning datastore a")?;
    let b = persistence::provision("b", &config.datastore_b_url, &config.seed_dir, &settings)
        .await
        .context("provisioning datastore b")?;

    // Build service layer
    let pet_service = Arc::new(PetService::new(
        XaDataSource::wrap(a),
        XaDataSource::wrap(b),
        TransactionManager::new(),
    ));

    // Build router
    let app = api::build_app(AppState { pet_service });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
