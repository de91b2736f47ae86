//! Embedded SQLite storage for sensor readings.
//!
//! A single [`Storage`] is opened at startup and cloned into every handler.
//! The pool is reference counted, so clones share the same connections.
//! SQLite serializes writers itself; the service adds no locking on top.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::models::{NewReading, SensorReading};
use crate::schema;

// ---

/// Failures at the storage boundary, one per operation kind.
///
/// The engine's own message is kept for server-side logging only.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Insert failed (disk full, lock contention, corruption, ...)
    #[error("failed to insert reading: {0}")]
    Write(#[source] sqlx::Error),

    /// Table scan failed
    #[error("failed to read readings: {0}")]
    Read(#[source] sqlx::Error),

    /// Bulk delete failed
    #[error("failed to purge readings: {0}")]
    Purge(#[source] sqlx::Error),
}

/// Handle on the readings database.
#[derive(Debug, Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (creating if missing) the database at `url`.
    ///
    /// File databases use WAL journaling so the dashboard can read while a
    /// sensor push is being written. `sqlite::memory:` gets a single
    /// connection that is never recycled, since each connection would
    /// otherwise see its own empty database.
    pub async fn connect(url: &str, pool_max: u32) -> Result<Self, sqlx::Error> {
        // ---
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        if url.contains(":memory:") {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?;
            return Ok(Self { pool });
        }

        Self::with_options(options.journal_mode(SqliteJournalMode::Wal), pool_max).await
    }

    /// Open a pool from caller-built connect options.
    pub async fn with_options(
        options: SqliteConnectOptions,
        pool_max: u32,
    ) -> Result<Self, sqlx::Error> {
        // ---
        let pool = SqlitePoolOptions::new()
            .max_connections(pool_max.max(1))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Ensure the readings table exists. Safe on every startup.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        schema::create_schema(&self.pool).await
    }

    /// Append one reading and return its newly assigned id.
    ///
    /// Absent fields are bound as NULL. The timestamp always comes from the
    /// database clock; a client-sent `timestamp` is ignored.
    pub async fn insert(&self, reading: &NewReading) -> Result<i64, StorageError> {
        // ---
        let result = sqlx::query(
            r#"
            INSERT INTO dados_sensores (
                sensor_id, temperatura, salinidade, ph, oxigenio, turbidez
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reading.sensor_id)
        .bind(reading.temperature)
        .bind(reading.salinity)
        .bind(reading.ph)
        .bind(reading.oxygen)
        .bind(reading.turbidity)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Write)?;

        Ok(result.last_insert_rowid())
    }

    /// Every stored reading, oldest first.
    pub async fn select_all(&self) -> Result<Vec<SensorReading>, StorageError> {
        // ---
        sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, sensor_id, temperatura, salinidade, ph, oxigenio, turbidez, timestamp
            FROM dados_sensores
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Read)
    }

    /// Remove every reading. Returns the number of rows deleted.
    pub async fn delete_all(&self) -> Result<u64, StorageError> {
        // ---
        let result = sqlx::query("DELETE FROM dados_sensores")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Purge)?;

        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        // ---
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dados_sensores")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Read)?;

        Ok(count)
    }

    /// Cheap liveness probe against the engine.
    pub async fn ping(&self) -> Result<(), StorageError> {
        // ---
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(StorageError::Read)?;

        Ok(())
    }

    /// Close the pool, flushing the WAL back into the main file.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
