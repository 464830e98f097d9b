//! # xa-gateway
//!
//! REST API demonstrating two-phase commit across two independent SQL
//! datastores.
//!
//! A write inserts a pet into datastore `a` and a greeting message into
//! datastore `b` inside one global transaction: both rows are committed, or
//! neither is. Passing `rollback=true` stages both inserts and then aborts,
//! showing that the rollback reaches both datastores.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PetService (service/)
//!     │
//!     ├── TransactionManager / GlobalTransaction (xa/)
//!     ├── XaDataSource a ──┐   XaDataSource b ──┐
//!     │                    │                    │
//!     └── Datastore a (SQLite)     Datastore b (SQLite)   (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod xa;
