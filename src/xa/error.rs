//! Error types for the transaction coordinator.

use super::transaction::{BranchId, TransactionState};
use super::xid::Xid;

/// Failures raised while enlisting, preparing, committing or rolling back
/// a global transaction.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A branch's datastore rejected an operation.
    #[error("branch {xid} failed: {source}")]
    Branch {
        /// Branch identifier.
        xid: Xid,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },

    /// Opening a new branch on a datastore failed.
    #[error("cannot enlist datastore {datastore} in {xid}: {source}")]
    Enlist {
        /// Global transaction identifier.
        xid: Xid,
        /// Logical datastore name.
        datastore: String,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The transaction is no longer accepting the requested operation.
    #[error("transaction {xid} is {state}, expected active")]
    InvalidState {
        /// Global transaction identifier.
        xid: Xid,
        /// State at the time of the call.
        state: TransactionState,
    },

    /// A branch voted against commit; every branch was rolled back.
    #[error("prepare failed for branch {xid}: {reason}")]
    PrepareFailed {
        /// Branch that voted against commit.
        xid: Xid,
        /// Reason reported by the branch.
        reason: String,
    },

    /// Some branches committed before another one failed to.
    #[error("heuristic mixed outcome: {committed} branch(es) committed before {failed} failed: {source}")]
    HeuristicMixed {
        /// Number of branches already committed.
        committed: usize,
        /// Branch whose commit failed.
        failed: Xid,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },

    /// No branch with the given handle is enlisted in this transaction.
    #[error("unknown branch {0}")]
    UnknownBranch(BranchId),
}
