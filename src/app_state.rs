//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::PetService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pet service for all reads and the coordinated write.
    pub pet_service: Arc<PetService>,
}
