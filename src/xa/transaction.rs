//! Global transaction: branch bookkeeping and the commit protocol.

use std::fmt;

use sqlx::SqliteConnection;

use super::error::TransactionError;
use super::resource::Branch;
use super::xid::Xid;

/// Lifecycle of a [`GlobalTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Accepting enlistments and work.
    Active,
    /// Collecting prepare votes.
    Preparing,
    /// Every branch voted to commit.
    Prepared,
    /// Committing branches.
    Committing,
    /// Every branch committed.
    Committed,
    /// Rolling branches back.
    RollingBack,
    /// Every branch rolled back.
    RolledBack,
    /// Some branches committed, others did not.
    HeuristicMixed,
}

impl TransactionState {
    /// Returns `true` once no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Committed | Self::RolledBack | Self::HeuristicMixed
        )
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Preparing => "preparing",
            Self::Prepared => "prepared",
            Self::Committing => "committing",
            Self::Committed => "committed",
            Self::RollingBack => "rolling_back",
            Self::RolledBack => "rolled_back",
            Self::HeuristicMixed => "heuristic_mixed",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vote returned by a branch in the prepare phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareVote {
    /// Branch is ready to commit.
    Prepared,
    /// Branch cannot commit.
    Error(String),
}

/// Handle to a branch enlisted in a [`GlobalTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchId(usize);

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of work spanning every enlisted datastore.
///
/// Obtained from [`super::TransactionManager::begin`]. Ends with exactly one
/// of [`GlobalTransaction::commit`] or [`GlobalTransaction::rollback`];
/// dropping it earlier rolls back every branch.
#[derive(Debug)]
pub struct GlobalTransaction {
    xid: Xid,
    state: TransactionState,
    branches: Vec<Branch>,
}

impl GlobalTransaction {
    pub(crate) fn new(xid: Xid) -> Self {
        Self {
            xid,
            state: TransactionState::Active,
            branches: Vec::new(),
        }
    }

    /// Global transaction identifier.
    #[must_use]
    pub const fn xid(&self) -> Xid {
        self.xid
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TransactionState {
        self.state
    }

    /// Number of branches currently enlisted.
    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Returns the connection of an enlisted branch. Statements executed on
    /// it become part of this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidState`] once the transaction has
    /// left [`TransactionState::Active`], or
    /// [`TransactionError::UnknownBranch`] for a foreign handle.
    pub fn connection(
        &mut self,
        branch: BranchId,
    ) -> Result<&mut SqliteConnection, TransactionError> {
        self.ensure_active()?;
        self.branches
            .get_mut(branch.0)
            .map(Branch::connection)
            .ok_or(TransactionError::UnknownBranch(branch))
    }

    pub(crate) fn ensure_active(&self) -> Result<(), TransactionError> {
        if self.state == TransactionState::Active {
            Ok(())
        } else {
            Err(TransactionError::InvalidState {
                xid: self.xid,
                state: self.state,
            })
        }
    }

    /// Next branch qualifier; branches are numbered from 1.
    pub(crate) fn next_branch_xid(&self) -> Xid {
        let bqual = u32::try_from(self.branches.len()).unwrap_or(u32::MAX);
        self.xid.branch(bqual.saturating_add(1))
    }

    pub(crate) fn register(&mut self, branch: Branch) -> BranchId {
        tracing::debug!(xid = %self.xid, branch = %branch.xid(), datastore = branch.datastore(), "branch enlisted");
        self.branches.push(branch);
        BranchId(self.branches.len() - 1)
    }

    /// Commits every enlisted branch atomically.
    ///
    /// With two or more branches every branch is prepared first and any
    /// negative vote rolls all of them back. A single branch is committed
    /// in one phase.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InvalidState`] if the transaction is not active.
    /// - [`TransactionError::PrepareFailed`] if a branch voted against commit.
    /// - [`TransactionError::Branch`] if the first commit failed; nothing
    ///   was committed.
    /// - [`TransactionError::HeuristicMixed`] if a commit failed after an
    ///   earlier branch had already committed.
    pub async fn commit(&mut self) -> Result<(), TransactionError> {
        self.ensure_active()?;

        if self.branches.len() > 1 {
            self.prepare_all().await?;
        }
        self.commit_branches().await
    }

    /// Commit phase: commits branches in enlistment order. The first
    /// failure rolls back every branch not yet committed.
    pub(crate) async fn commit_branches(&mut self) -> Result<(), TransactionError> {
        self.transition(TransactionState::Committing);
        let mut committed = 0usize;
        let mut branches = std::mem::take(&mut self.branches).into_iter();
        while let Some(branch) = branches.next() {
            let failed = branch.xid();
            if let Err(source) = branch.commit().await {
                for rest in branches.by_ref() {
                    rest.rollback().await;
                }
                if committed == 0 {
                    self.transition(TransactionState::RolledBack);
                    return Err(TransactionError::Branch { xid: failed, source });
                }
                self.transition(TransactionState::HeuristicMixed);
                tracing::error!(xid = %self.xid, %failed, committed, error = %source, "heuristic mixed outcome");
                return Err(TransactionError::HeuristicMixed {
                    committed,
                    failed,
                    source,
                });
            }
            committed += 1;
        }

        self.transition(TransactionState::Committed);
        tracing::debug!(xid = %self.xid, branches = committed, "global transaction committed");
        Ok(())
    }

    /// Rolls back every enlisted branch.
    ///
    /// Branch rollback failures are logged; the connection is discarded
    /// and the datastore abandons the branch.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidState`] if the transaction is not
    /// active.
    pub async fn rollback(&mut self) -> Result<(), TransactionError> {
        self.ensure_active()?;
        self.rollback_all().await;
        Ok(())
    }

    async fn prepare_all(&mut self) -> Result<(), TransactionError> {
        self.transition(TransactionState::Preparing);

        let mut rejected = None;
        for branch in &mut self.branches {
            if let PrepareVote::Error(reason) = branch.prepare().await {
                rejected = Some((branch.xid(), reason));
                break;
            }
        }

        if let Some((xid, reason)) = rejected {
            tracing::warn!(xid = %self.xid, branch = %xid, %reason, "branch voted to roll back");
            self.rollback_all().await;
            return Err(TransactionError::PrepareFailed { xid, reason });
        }

        self.transition(TransactionState::Prepared);
        Ok(())
    }

    async fn rollback_all(&mut self) {
        self.transition(TransactionState::RollingBack);
        for branch in std::mem::take(&mut self.branches) {
            branch.rollback().await;
        }
        self.transition(TransactionState::RolledBack);
    }

    fn transition(&mut self, to: TransactionState) {
        tracing::trace!(xid = %self.xid, from = %self.state, %to, "state transition");
        self.state = to;
    }
}

impl Drop for GlobalTransaction {
    fn drop(&mut self) {
        let interrupted = self.state == TransactionState::Committing;
        if !self.state.is_terminal() && (interrupted || !self.branches.is_empty()) {
            tracing::warn!(
                xid = %self.xid,
                state = %self.state,
                branches = self.branches.len(),
                "global transaction dropped before completion; rolling back"
            );
        }
    }
}
