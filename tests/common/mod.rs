//! Shared fixtures for the end-to-end tests.

#![allow(clippy::panic, dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use xa_gateway::api;
use xa_gateway::app_state::AppState;
use xa_gateway::persistence::{PoolSettings, provision};
use xa_gateway::service::PetService;
use xa_gateway::xa::{TransactionManager, XaDataSource};

/// Provisions two fresh in-memory datastores from the shipped seed scripts
/// and returns the fully layered application.
pub async fn app() -> Router {
    let seeds = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds");
    let settings = PoolSettings::default();
    let (Ok(a), Ok(b)) = (
        provision("a", "sqlite::memory:", &seeds, &settings).await,
        provision("b", "sqlite::memory:", &seeds, &settings).await,
    ) else {
        panic!("provisioning failed");
    };
    let pet_service = Arc::new(PetService::new(
        XaDataSource::wrap(a),
        XaDataSource::wrap(b),
        TransactionManager::new(),
    ));
    api::build_app(AppState { pet_service })
}

/// Serves [`app`] on an ephemeral local port and returns its base URL.
pub async fn spawn_server() -> String {
    let app = app().await;
    let Ok(listener) = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await
    else {
        panic!("bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}
