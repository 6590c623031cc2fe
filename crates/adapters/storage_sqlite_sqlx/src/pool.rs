//! Opening the `SQLite` database.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// An open, migrated database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open `database_url` (e.g. `sqlite:tpfoyer.db` or `sqlite::memory:`),
    /// creating the file when missing, and apply pending migrations.
    ///
    /// Foreign keys are enforced on every pooled connection so a bloc cannot
    /// point at a foyer that does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the connection fails,
    /// or a migration fails.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(database_url, "database ready");

        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
