//! SQLite connection pool management

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Embedded schema, applied by [`run_migrations`]
const SCHEMA: &str = include_str!("../../migrations/schema.sql");

/// Database configuration for connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite://file.db`, `sqlite::memory:`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection
    pub acquire_timeout: Duration,
    /// Maximum idle time before a connection is closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("sqlite://salas.db"),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl DatabaseConfig {
    /// Private in-memory database, used by tests
    pub fn in_memory() -> Self {
        Self {
            url: String::from("sqlite::memory:"),
            ..Default::default()
        }
    }

    /// Every connection to an in-memory URL opens a separate database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl From<&sala_common::DatabaseConfig> for DatabaseConfig {
    fn from(config: &sala_common::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections.max(1),
            min_connections: config.min_connections,
            ..Default::default()
        }
    }
}

/// Create a new SQLite connection pool
///
/// The database file is created when missing and foreign keys are enforced
/// on every connection. In-memory databases are pinned to one connection
/// that is never recycled.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().acquire_timeout(config.acquire_timeout);

    let pool = if config.is_in_memory() {
        pool.max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
    };

    pool.connect_with(options).await
}

/// Create the tables and indexes if they do not exist yet
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Round-trip a trivial query, used by readiness checks
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
