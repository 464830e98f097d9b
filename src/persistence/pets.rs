//! Queries against the `pet` table of datastore `a`.

use sqlx::{Executor, Sqlite};

use crate::domain::Pet;
use crate::error::GatewayError;

/// Inserts a pet.
///
/// # Errors
///
/// Returns a [`GatewayError::PersistenceError`] on database failure.
pub async fn insert_pet<'e, E>(executor: E, pet: &Pet) -> Result<(), GatewayError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("INSERT INTO pet (id, nickname) VALUES (?, ?)")
        .bind(pet.id.to_string())
        .bind(pet.nickname.as_str())
        .execute(executor)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;
    Ok(())
}

/// Lists every committed nickname in insertion order.
///
/// # Errors
///
/// Returns a [`GatewayError::PersistenceError`] on database failure.
pub async fn list_nicknames<'e, E>(executor: E) -> Result<Vec<String>, GatewayError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, String>("SELECT nickname FROM pet ORDER BY rowid")
        .fetch_all(executor)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))
}
