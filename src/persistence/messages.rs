//! Queries against the `message` table of datastore `b`.

use sqlx::{Executor, Sqlite};

use crate::domain::Message;
use crate::error::GatewayError;

/// Inserts a message.
///
/// # Errors
///
/// Returns a [`GatewayError::PersistenceError`] on database failure.
pub async fn insert_message<'e, E>(executor: E, message: &Message) -> Result<(), GatewayError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO message (id, message) VALUES (?, ?)")
        .bind(message.id.to_string())
        .bind(message.message.as_str())
        .execute(executor)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
    Ok(())
}

/// Lists every committed message text in insertion order.
///
/// # Errors
///
/// Returns a [`GatewayError::PersistenceError`] on database failure.
pub async fn list_messages<'e, E>(executor: E) -> Result<Vec<String>, GatewayError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, String>("SELECT message FROM message ORDER BY rowid")
        .fetch_all(executor)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::path::PathBuf;

    use tokio_test::assert_ok;

    use super::*;
    use crate::persistence::{PoolSettings, pets, provision};

    #[tokio::test]
    async fn messages_and_pets_live_in_separate_datastores() {
        let seeds = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds");
        let settings = PoolSettings::default();
        let (Ok(a), Ok(b)) = (
            provision("a", "sqlite::memory:", &seeds, &settings).await,
            provision("b", "sqlite::memory:", &seeds, &settings).await,
        ) else {
            panic!("provision");
        };

        assert_ok!(insert_message(b.pool(), &Message::greeting("Joe Black")).await);
        assert_ok!(insert_message(b.pool(), &Message::greeting("Jane")).await);

        let Ok(texts) = list_messages(b.pool()).await else {
            panic!("list messages");
        };
        assert_eq!(texts, vec!["Hello, Joe Black", "Hello, Jane"]);

        assert!(list_messages(a.pool()).await.is_err());
        let Ok(nicknames) = pets::list_nicknames(a.pool()).await else {
            panic!("list pets");
        };
        assert!(nicknames.is_empty());
    }
}
