//! Persistence layer: datastore handles, provisioning, and record queries.
//!
//! Each logical datastore is an isolated SQLite database behind its own
//! `sqlx::SqlitePool`. Query functions are generic over `sqlx::Executor`
//! so the same code runs against a pool (plain reads) or a branch
//! connection of a global transaction (coordinated writes).

pub mod datastore;
pub mod messages;
pub mod pets;
pub mod provisioner;

pub use datastore::{Datastore, PoolSettings};
pub use provisioner::{ProvisionError, provision};
