//! Database schema management for the water-quality service.
//!
//! Ensures the reading table exists before serving requests.
//! Applied once on startup through [`crate::Storage::init_schema`].

use sqlx::SqlitePool;

// ---

/// Create the database schema (idempotent).
///
/// `AUTOINCREMENT` keeps ids strictly increasing for the lifetime of the
/// file, including after every row has been purged. Safe to call on every
/// startup; no-op if the table already exists.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // ---
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dados_sensores (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sensor_id   INTEGER,
            temperatura REAL,
            salinidade  REAL,
            ph          REAL,
            oxigenio    REAL,
            turbidez    REAL,
            timestamp   DATETIME DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
