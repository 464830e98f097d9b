//! Entry point for demarcating global transactions.

use super::transaction::GlobalTransaction;
use super::xid::Xid;

/// Begins [`GlobalTransaction`]s.
///
/// Holds no per-transaction state; every global transaction owns its
/// branches, so concurrent requests share nothing but the datastores.
#[derive(Debug, Clone, Default)]
pub struct TransactionManager;

impl TransactionManager {
    /// Creates a transaction manager.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Begins a new global transaction with no branches enlisted.
    #[must_use]
    pub fn begin(&self) -> GlobalTransaction {
        let xid = Xid::new_global();
        tracing::debug!(%xid, "global transaction started");
        GlobalTransaction::new(xid)
    }
}
