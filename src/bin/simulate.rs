//! Posts synthetic readings to a running service until Ctrl-C.
//!
//! # Environment Variables
//! - `SIMULATOR_TARGET_URL` (optional) – service base URL (default: `http://localhost:3000`)
//! - `SIMULATOR_INTERVAL_SECS` (optional) – seconds between readings (default: 10)
//! - `SIMULATOR_SENSOR_ID` (optional) – sensor id stamped on readings (default: 1)
use anyhow::{Context, Result};
use dotenvy::dotenv;

use water_quality_service::{config, init_tracing, scheduler::PeriodicTask, simulator::Simulator};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let cfg = config::load_simulator_from_env()?;
    cfg.log_config();

    let simulator = Simulator::new(&cfg.target_url, cfg.sensor_id);
    tracing::info!("Sending readings to {}", simulator.endpoint());

    let task = PeriodicTask::new();
    simulator.start(&task, cfg.interval);

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    task.stop();
    tracing::info!("Simulator stopped");

    Ok(())
}
