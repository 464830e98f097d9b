//! Pooled handle to one isolated SQLite database.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqliteConnection, SqlitePool};

use super::provisioner::ProvisionError;

/// Connection pool settings shared by both datastores.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    /// Maximum pool size for file-backed databases.
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Connection held outside the pool for the lifetime of an in-memory
/// datastore. A shared-cache in-memory database is freed when its last
/// connection closes; this one never closes, so the pool may drop and
/// reopen its own connections without losing the schema or the rows.
struct MemoryAnchor {
    _connection: Mutex<SqliteConnection>,
}

impl fmt::Debug for MemoryAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAnchor").finish_non_exhaustive()
    }
}

/// A named, pooled datastore.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Datastore {
    name: String,
    pool: SqlitePool,
    anchor: Option<Arc<MemoryAnchor>>,
}

impl Datastore {
    /// Opens a pool for `url` without running any seed script.
    ///
    /// `sqlite::memory:` is rewritten to a shared-cache database named
    /// after the datastore and unique to this call, so every connection of
    /// the pool sees the same data. The pool is limited to one connection
    /// (shared-cache writers lock whole tables) and an anchor connection
    /// keeps the database alive while connections are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Connect`] if the URL is invalid or the
    /// database cannot be opened.
    pub async fn connect(
        name: &str,
        url: &str,
        settings: &PoolSettings,
    ) -> Result<Self, ProvisionError> {
        let connect_err = |source| ProvisionError::Connect {
            datastore: name.to_string(),
            source,
        };

        let in_memory = is_in_memory(url);
        let url = if in_memory && !url.contains("mode=memory") {
            Cow::Owned(shared_memory_url(name))
        } else {
            Cow::Borrowed(url)
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(connect_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let (pool_options, anchor) = if in_memory {
            let connection = options.connect().await.map_err(connect_err)?;
            let anchor = MemoryAnchor {
                _connection: Mutex::new(connection),
            };
            (
                SqlitePoolOptions::new().max_connections(1),
                Some(Arc::new(anchor)),
            )
        } else {
            (
                SqlitePoolOptions::new().max_connections(settings.max_connections.max(1)),
                None,
            )
        };

        let pool = pool_options
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(connect_err)?;

        tracing::debug!(datastore = name, url = %url, in_memory, "datastore pool opened");
        Ok(Self {
            name: name.to_string(),
            pool,
            anchor,
        })
    }

    /// Logical datastore name (`"a"` or `"b"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trips a trivial query.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the datastore does not answer.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Returns `true` when the database lives in process memory.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.anchor.is_some()
    }

    /// Closes the pool; later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn shared_memory_url(name: &str) -> String {
    format!(
        "sqlite:file:xa-{name}-{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use sqlx::Connection;
    use tokio_test::assert_ok;

    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:a?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/a.db"));
    }

    #[test]
    fn shared_memory_urls_are_unique_per_call() {
        let first = shared_memory_url("a");
        assert!(first.starts_with("sqlite:file:xa-a-"));
        assert!(is_in_memory(&first));
        assert_ne!(first, shared_memory_url("a"));
    }

    #[tokio::test]
    async fn in_memory_database_outlives_a_discarded_connection() {
        let Ok(ds) = Datastore::connect("a", "sqlite::memory:", &PoolSettings::default()).await
        else {
            panic!("connect");
        };
        assert!(ds.is_in_memory());
        assert_ok!(sqlx::query("CREATE TABLE t (v INTEGER)").execute(ds.pool()).await);
        assert_ok!(sqlx::query("INSERT INTO t (v) VALUES (1)").execute(ds.pool()).await);

        let Ok(pooled) = ds.pool().acquire().await else {
            panic!("acquire");
        };
        assert_ok!(pooled.detach().close().await);

        let Ok(n) = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM t")
            .fetch_one(ds.pool())
            .await
        else {
            panic!("schema and rows lost with the pooled connection");
        };
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn in_memory_state_survives_across_acquires() {
        let Ok(ds) = Datastore::connect("a", "sqlite::memory:", &PoolSettings::default()).await
        else {
            panic!("connect");
        };
        assert_ok!(sqlx::query("CREATE TABLE t (v INTEGER)").execute(ds.pool()).await);
        assert_ok!(sqlx::query("INSERT INTO t (v) VALUES (1)").execute(ds.pool()).await);
        let Ok(n) = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM t")
            .fetch_one(ds.pool())
            .await
        else {
            panic!("count");
        };
        assert_eq!(n, 1);
        assert_eq!(ds.name(), "a");
    }

    #[tokio::test]
    async fn separate_datastores_are_isolated() {
        let settings = PoolSettings::default();
        let (Ok(a), Ok(b)) = (
            Datastore::connect("a", "sqlite::memory:", &settings).await,
            Datastore::connect("b", "sqlite::memory:", &settings).await,
        ) else {
            panic!("connect");
        };
        assert_ok!(sqlx::query("CREATE TABLE only_in_a (v INTEGER)").execute(a.pool()).await);
        assert!(
            sqlx::query("SELECT * FROM only_in_a")
                .fetch_all(b.pool())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn ping_fails_after_close() {
        let Ok(ds) = Datastore::connect("a", "sqlite::memory:", &PoolSettings::default()).await
        else {
            panic!("connect");
        };
        assert_ok!(ds.ping().await);
        ds.close().await;
        assert!(ds.ping().await.is_err());
    }

    #[tokio::test]
    async fn unopenable_path_is_a_connect_error() {
        let result = Datastore::connect(
            "a",
            "sqlite://no/such/directory/a.db",
            &PoolSettings::default(),
        )
        .await;
        assert!(matches!(result, Err(ProvisionError::Connect { .. })));
    }
}
