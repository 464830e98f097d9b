//! Pet service: listings and the coordinated two-datastore write.

use crate::domain::{Message, Pet, WriteStage};
use crate::error::GatewayError;
use crate::persistence::{messages, pets};
use crate::xa::{GlobalTransaction, TransactionManager, XaDataSource};

/// Reachability of both datastores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatastoreHealth {
    /// Datastore `a` answered.
    pub a: bool,
    /// Datastore `b` answered.
    pub b: bool,
}

impl DatastoreHealth {
    /// Both datastores answered.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.a && self.b
    }
}

/// Orchestration layer for reads and the coordinated write.
///
/// Owns the two enlistable datastores and the transaction manager. Holds
/// no per-request state, so one instance serves all requests.
#[derive(Debug, Clone)]
pub struct PetService {
    pets: XaDataSource,
    messages: XaDataSource,
    transactions: TransactionManager,
}

impl PetService {
    /// Creates a new `PetService` from datastore `a` (pets), datastore `b`
    /// (messages) and the coordinator.
    #[must_use]
    pub fn new(
        pets: XaDataSource,
        messages: XaDataSource,
        transactions: TransactionManager,
    ) -> Self {
        Self {
            pets,
            messages,
            transactions,
        }
    }

    /// Lists every committed pet nickname from datastore `a`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_pets(&self) -> Result<Vec<String>, GatewayError> {
        pets::list_nicknames(self.pets.datastore().pool()).await
    }

    /// Lists every committed message text from datastore `b`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn list_messages(&self) -> Result<Vec<String>, GatewayError> {
        messages::list_messages(self.messages.datastore().pool()).await
    }

    /// Inserts a pet named `name` into `a` and the greeting for `name`
    /// into `b` inside one global transaction.
    ///
    /// With `rollback` set both inserts are staged and then discarded.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::WriteAborted`] when `rollback` is set.
    /// - [`GatewayError::Transaction`] if enlisting or committing fails.
    /// - [`GatewayError::PersistenceError`] if an insert fails.
    ///
    /// - [`GatewayError::Internal`] if the write task panicked.
    ///
    /// In every error case neither insert is kept.
    ///
    /// The transaction runs on its own task. Dropping the returned future
    /// (a client disconnect) does not interrupt it between the two branch
    /// commits; it still ends committed or rolled back.
    pub async fn write(&self, name: &str, rollback: bool) -> Result<(), GatewayError> {
        let service = self.clone();
        let name = name.to_owned();
        tokio::spawn(async move { service.run_write(&name, rollback).await })
            .await
            .map_err(|e| GatewayError::Internal(format!("write task failed: {e}")))?
    }

    async fn run_write(&self, name: &str, rollback: bool) -> Result<(), GatewayError> {
        let mut tx = self.transactions.begin();
        let xid = tx.xid();
        let mut stage = WriteStage::Started;

        let staged = self.stage_write(&mut tx, name, &mut stage).await;
        let staged = staged.and_then(|()| {
            if rollback {
                Err(GatewayError::WriteAborted)
            } else {
                Ok(())
            }
        });

        if let Err(err) = staged {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(%xid, error = %rollback_err, "rollback after failed write");
            }
            tracing::warn!(%xid, reached = %stage, stage = %WriteStage::Aborted, error = %err, "write aborted");
            return Err(err);
        }

        if let Err(err) = tx.commit().await {
            tracing::warn!(%xid, reached = %stage, stage = %WriteStage::Aborted, error = %err, "commit failed");
            return Err(err.into());
        }

        tracing::info!(%xid, stage = %WriteStage::Committed, name, "write committed");
        Ok(())
    }

    async fn stage_write(
        &self,
        tx: &mut GlobalTransaction,
        name: &str,
        stage: &mut WriteStage,
    ) -> Result<(), GatewayError> {
        let branch_a = self.pets.enlist(tx).await?;
        pets::insert_pet(tx.connection(branch_a)?, &Pet::named(name)).await?;
        *stage = WriteStage::InsertedA;
        tracing::debug!(xid = %tx.xid(), %stage, "pet staged");

        let branch_b = self.messages.enlist(tx).await?;
        messages::insert_message(tx.connection(branch_b)?, &Message::greeting(name)).await?;
        *stage = WriteStage::InsertedB;
        tracing::debug!(xid = %tx.xid(), %stage, "message staged");

        Ok(())
    }

    /// Pings both datastores.
    pub async fn health(&self) -> DatastoreHealth {
        let (a, b) = tokio::join!(
            self.pets.datastore().ping(),
            self.messages.datastore().ping()
        );
        DatastoreHealth {
            a: a.is_ok(),
            b: b.is_ok(),
        }
    }
}
