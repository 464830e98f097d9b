//! Service layer: business logic orchestration.
//!
//! [`PetService`] reads from either datastore and runs the coordinated
//! write through the [`crate::xa`] coordinator.

pub mod pet_service;

pub use pet_service::{DatastoreHealth, PetService};
