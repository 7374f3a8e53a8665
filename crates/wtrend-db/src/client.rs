//! Database client and connection management

use crate::{DbError, DbResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Path value that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Database client wrapping an sqlx SQLite pool
#[derive(Clone)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    /// Open (creating if missing) the database file at `path` and verify it
    /// answers. `":memory:"` opens an in-memory database instead.
    pub async fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if path == Path::new(IN_MEMORY) {
            return Self::in_memory().await;
        }
        DbConnectionBuilder::new(path).connect().await
    }

    /// Open an in-memory database that lives as long as this client.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn in_memory() -> DbResult<Self> {
        let opts =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(DbError::StorageUnavailable)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(opts)
            .await
            .map_err(DbError::StorageUnavailable)?;

        let client = Self { pool };
        client.ping().await?;
        debug!("Opened in-memory weather store");
        Ok(client)
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Test the database connection
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::StorageUnavailable)?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}

/// Build SQLite connection options for a database file
pub struct DbConnectionBuilder {
    path: PathBuf,
    max_connections: u32,
    create_if_missing: bool,
}

impl DbConnectionBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
            create_if_missing: true,
        }
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn build(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(self.create_if_missing)
    }

    /// Connect and ping
    pub async fn connect(self) -> DbResult<DbClient> {
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(self.build())
            .await
            .map_err(DbError::StorageUnavailable)?;

        let client = DbClient { pool };
        client.ping().await?;
        info!(path = %self.path.display(), "Opened weather store");
        Ok(client)
    }
}
