//! Ingestion and retrieval service for water-quality sensor readings.
//!
//! Sensors (or the [`simulator`]) POST temperature, salinity, pH, dissolved
//! oxygen and turbidity readings; the dashboard polls them back and can
//! purge the table. Everything is persisted in a single SQLite file.
//!
//! Module layout:
//! - `config` parses environment variables into [`Config`]
//! - `schema` and `storage` own the SQLite table and every query against it
//! - `routes` mounts the HTTP endpoints on an axum [`axum::Router`]
//! - `scheduler` and `simulator` drive the optional synthetic producer
use std::{env, io::IsTerminal};

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

pub mod config;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod schema;
pub mod simulator;
pub mod storage;

pub use config::{Config, SimulatorConfig};
pub use models::{NewReading, SensorReading};
pub use storage::{Storage, StorageError};

// ---

/// Open the database and make sure the readings table exists.
///
/// Any failure here is fatal: the service must not accept traffic without
/// its table.
pub async fn open_storage(cfg: &Config) -> Result<Storage> {
    // ---
    let storage = Storage::connect(&cfg.db_url, cfg.db_pool_max)
        .await
        .with_context(|| format!("Failed to open database '{}'", cfg.db_url))?;

    storage
        .init_schema()
        .await
        .context("Failed to create the readings table")?;

    Ok(storage)
}

/// Serve the API on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, storage: Storage) -> Result<()> {
    // ---
    let app = routes::router(storage);

    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize the global tracing subscriber for structured logging.
///
/// This function configures the [`tracing_subscriber`] with:
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `APP_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level controlled by `RUST_LOG`, falling back to `APP_LOG_LEVEL`
///
/// Call once at startup, before any logging macro runs.
pub fn init_tracing() {
    // ---
    let span_events = match env::var("APP_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("APP_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},sqlx::query=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
