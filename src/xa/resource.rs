//! Transactional wrapper around a [`Datastore`].
//!
//! [`XaDataSource`] only declares participation: it opens a local
//! transaction on its datastore and hands it to the global transaction as a
//! [`Branch`]. Deciding when that branch commits belongs to
//! [`GlobalTransaction`].

use std::fmt;

use sqlx::{Connection, Sqlite, SqliteConnection, Transaction};

use super::error::TransactionError;
use super::transaction::{BranchId, GlobalTransaction, PrepareVote};
use super::xid::Xid;
use crate::persistence::Datastore;

/// A datastore that can enlist in a [`GlobalTransaction`].
#[derive(Debug, Clone)]
pub struct XaDataSource {
    datastore: Datastore,
}

impl XaDataSource {
    /// Wraps a provisioned datastore.
    #[must_use]
    pub fn wrap(datastore: Datastore) -> Self {
        Self { datastore }
    }

    /// The wrapped datastore, for reads outside any global transaction.
    #[must_use]
    pub fn datastore(&self) -> &Datastore {
        &self.datastore
    }

    /// Opens a branch on this datastore and enlists it in `tx`.
    ///
    /// # Errors
    ///
    /// Returns [`TransactionError::InvalidState`] if `tx` is not active, or
    /// [`TransactionError::Enlist`] if no connection could be obtained.
    pub async fn enlist(&self, tx: &mut GlobalTransaction) -> Result<BranchId, TransactionError> {
        tx.ensure_active()?;
        let local = self
            .datastore
            .pool()
            .begin()
            .await
            .map_err(|source| TransactionError::Enlist {
                xid: tx.xid(),
                datastore: self.datastore.name().to_string(),
                source,
            })?;

        let branch = Branch {
            xid: tx.next_branch_xid(),
            datastore: self.datastore.name().to_string(),
            local,
        };
        Ok(tx.register(branch))
    }
}

/// One datastore's share of a global transaction.
pub(crate) struct Branch {
    xid: Xid,
    datastore: String,
    local: Transaction<'static, Sqlite>,
}

impl Branch {
    pub(crate) const fn xid(&self) -> Xid {
        self.xid
    }

    pub(crate) fn datastore(&self) -> &str {
        &self.datastore
    }

    pub(crate) fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.local
    }

    /// SQLite keeps no durable prepared state, so the vote checks that the
    /// branch could still commit: the connection answers and no deferred
    /// foreign key is left dangling.
    pub(crate) async fn prepare(&mut self) -> PrepareVote {
        if let Err(err) = self.local.ping().await {
            return PrepareVote::Error(format!("connection lost: {err}"));
        }

        match sqlx::query("PRAGMA foreign_key_check")
            .fetch_all(&mut *self.local)
            .await
        {
            Ok(violations) if violations.is_empty() => PrepareVote::Prepared,
            Ok(violations) => PrepareVote::Error(format!(
                "{} foreign key violation(s) in {}",
                violations.len(),
                self.datastore
            )),
            Err(err) => PrepareVote::Error(err.to_string()),
        }
    }

    pub(crate) async fn commit(self) -> Result<(), sqlx::Error> {
        tracing::trace!(branch = %self.xid, datastore = %self.datastore, "committing branch");
        self.local.commit().await
    }

    pub(crate) async fn rollback(self) {
        if let Err(err) = self.local.rollback().await {
            tracing::warn!(branch = %self.xid, datastore = %self.datastore, error = %err, "branch rollback failed");
        }
    }
}

impl fmt::Debug for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Branch")
            .field("xid", &self.xid)
            .field("datastore", &self.datastore)
            .finish_non_exhaustive()
    }
}
