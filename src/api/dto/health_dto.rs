//! Health check DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Response body for `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `"healthy"` when both datastores answer, `"degraded"` otherwise.
    pub status: String,
    /// Per-datastore reachability.
    pub datastores: DatastoreStatus,
    /// Current server time (RFC 3339).
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Reachability of each datastore.
#[derive(Debug, Serialize, ToSchema)]
pub struct DatastoreStatus {
    /// Datastore `a` (pets).
    pub a: bool,
    /// Datastore `b` (messages).
    pub b: bool,
}
