//! Datastore provisioning: open the database, then run its seed script
//! before anything else can see the handle.

use std::path::{Path, PathBuf};

use super::datastore::{Datastore, PoolSettings};

/// Failures that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The database could not be opened.
    #[error("cannot open datastore {datastore}: {source}")]
    Connect {
        /// Logical datastore name.
        datastore: String,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },

    /// The seed script is missing or unreadable.
    #[error("seed script {} for datastore {datastore} unreadable: {source}", .path.display())]
    SeedScriptMissing {
        /// Logical datastore name.
        datastore: String,
        /// Expected script location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The seed script failed to execute.
    #[error("seed script {} failed on datastore {datastore}: {source}", .path.display())]
    SeedScriptFailed {
        /// Logical datastore name.
        datastore: String,
        /// Script location.
        path: PathBuf,
        /// Underlying driver error.
        #[source]
        source: sqlx::Error,
    },
}

/// Opens datastore `name` at `url` and runs `<seed_dir>/<name>.sql`
/// against it.
///
/// The script is read before the database is opened, and the pool is
/// closed again if the script fails, so a failed call never leaves a
/// reachable half-seeded datastore behind.
///
/// # Errors
///
/// Returns a [`ProvisionError`] if the script is missing, the database
/// cannot be opened, or the script fails.
pub async fn provision(
    name: &str,
    url: &str,
    seed_dir: &Path,
    settings: &PoolSettings,
) -> Result<Datastore, ProvisionError> {
    let path = seed_dir.join(format!("{name}.sql"));
    let script = tokio::fs::read_to_string(&path).await.map_err(|source| {
        ProvisionError::SeedScriptMissing {
            datastore: name.to_string(),
            path: path.clone(),
            source,
        }
    })?;

    let datastore = Datastore::connect(name, url, settings).await?;

    if let Err(source) = sqlx::raw_sql(&script).execute(datastore.pool()).await {
        datastore.close().await;
        return Err(ProvisionError::SeedScriptFailed {
            datastore: name.to_string(),
            path,
            source,
        });
    }

    tracing::info!(datastore = name, script = %path.display(), "datastore provisioned");
    Ok(datastore)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::pets;

    fn seed_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
    }

    #[tokio::test]
    async fn provisions_from_shipped_seed_script() {
        let result = provision("a", "sqlite::memory:", &seed_dir(), &PoolSettings::default()).await;
        let Ok(ds) = &result else {
            panic!("provision failed: {result:?}");
        };
        let Ok(nicknames) = pets::list_nicknames(ds.pool()).await else {
            panic!("seeded pet table should be queryable");
        };
        assert!(nicknames.is_empty());
    }

    #[tokio::test]
    async fn missing_script_fails_before_connecting() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let result = provision("a", "sqlite::memory:", dir.path(), &PoolSettings::default()).await;
        let Err(ProvisionError::SeedScriptMissing { datastore, path, .. }) = result else {
            panic!("expected missing script error");
        };
        assert_eq!(datastore, "a");
        assert_eq!(path, dir.path().join("a.sql"));
    }

    #[tokio::test]
    async fn broken_script_is_reported() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let Ok(()) = std::fs::write(dir.path().join("b.sql"), "CREATE TABLE (;") else {
            panic!("write script");
        };
        let result = provision("b", "sqlite::memory:", dir.path(), &PoolSettings::default()).await;
        assert!(matches!(result, Err(ProvisionError::SeedScriptFailed { .. })));
    }

    #[tokio::test]
    async fn reprovisioning_a_file_database_resets_it_to_seed_data() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let url = format!("sqlite://{}", dir.path().join("a.db").display());
        let settings = PoolSettings::default();

        let Ok(first) = provision("a", &url, &seed_dir(), &settings).await else {
            panic!("first provision");
        };
        let Ok(()) = pets::insert_pet(first.pool(), &crate::domain::Pet::named("Rex")).await else {
            panic!("insert");
        };
        first.close().await;

        let Ok(second) = provision("a", &url, &seed_dir(), &settings).await else {
            panic!("second provision");
        };
        let Ok(nicknames) = pets::list_nicknames(second.pool()).await else {
            panic!("list");
        };
        assert!(nicknames.is_empty());
    }
}
