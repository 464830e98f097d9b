//! Two-phase commit coordination across SQL datastores.
//!
//! [`XaDataSource`] wraps a provisioned [`crate::persistence::Datastore`]
//! and enlists it in a [`GlobalTransaction`] begun by the
//! [`TransactionManager`]. Work runs on the branch connections; the global
//! transaction then prepares every branch and commits them all, or rolls
//! them all back.
//!
//! ```text
//! Active ──commit──▶ Preparing ──▶ Prepared ──▶ Committing ──▶ Committed
//!    │                   │                          │
//!    │                   └─ vote failed ─┐          └─ partial ─▶ HeuristicMixed
//!    └──rollback────────────────────────▶ RollingBack ──▶ RolledBack
//! ```

pub mod error;
pub mod manager;
pub mod resource;
pub mod transaction;
pub mod xid;

pub use error::TransactionError;
pub use manager::TransactionManager;
pub use resource::XaDataSource;
pub use transaction::{BranchId, GlobalTransaction, PrepareVote, TransactionState};
pub use xid::Xid;
