//! Application entry point for the water-quality ingestion service.
//!
//! Startup sequence:
//! - Initialize structured logging/tracing
//! - Load configuration from environment variables or `.env`
//! - Open the SQLite database and create the readings table if missing
//! - Bind the HTTP listener and serve the API
//!
//! The table exists before the port is opened, so no request can observe a
//! missing schema.
//!
//! # Environment Variables
//! - `DATABASE_URL` (optional) – SQLite URL (default: `sqlite://banco-de-dados.db`)
//! - `DB_POOL_MAX` (optional) – maximum number of DB connections (default: 5)
//! - `BIND_ADDR` / `PORT` (optional) – listen address (default: `0.0.0.0:3000`)
//! - `APP_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `APP_SPAN_EVENTS` (optional) – span event mode for tracing
use anyhow::{Context, Result};
use dotenvy::dotenv;

use water_quality_service::{config, init_tracing, open_storage, serve};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let storage = open_storage(&cfg).await?;
    tracing::info!("Database ready: {}", cfg.db_url);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.bind_addr))?;

    serve(listener, storage).await
}
