//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8090`).
    pub listen_addr: SocketAddr,

    /// Connection URL for datastore `a` (pets).
    pub datastore_a_url: String,

    /// Connection URL for datastore `b` (messages).
    pub datastore_b_url: String,

    /// Maximum number of connections per datastore pool.
    ///
    /// Ignored for in-memory databases, which always use one connection.
    pub database_max_connections: u32,

    /// Timeout in seconds for acquiring a datastore connection.
    pub database_connect_timeout_secs: u64,

    /// Directory holding the `<name>.sql` seed scripts.
    pub seed_dir: PathBuf,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            datastore_a_url: DEFAULT_DATASTORE_URL.to_string(),
            datastore_b_url: DEFAULT_DATASTORE_URL.to_string(),
            database_max_connections: 1,
            database_connect_timeout_secs: 5,
            seed_dir: PathBuf::from("seeds"),
        }
    }
}

const DEFAULT_DATASTORE_URL: &str = "sqlite::memory:";

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid LISTEN_ADDR: {raw}"))?,
            Err(_) => defaults.listen_addr,
        };

        let datastore_a_url =
            std::env::var("DATASTORE_A_URL").unwrap_or(defaults.datastore_a_url);
        let datastore_b_url =
            std::env::var("DATASTORE_B_URL").unwrap_or(defaults.datastore_b_url);

        let database_max_connections =
            parse_env("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections);
        let database_connect_timeout_secs = parse_env(
            "DATABASE_CONNECT_TIMEOUT_SECS",
            defaults.database_connect_timeout_secs,
        );

        let seed_dir = std::env::var("SEED_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.seed_dir);

        Ok(Self {
            listen_addr,
            datastore_a_url,
            datastore_b_url,
            database_max_connections,
            database_connect_timeout_secs,
            seed_dir,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
