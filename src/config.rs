//! Configuration loader for the water-quality service and its simulator.
//!
//! All runtime settings and their defaults live here, loaded from environment
//! variables (with optional `.env` support provided by the caller), so the
//! rest of the crate never touches `env::var` directly.
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};

/// Parse an optional variable into `$ty` with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string variable with a default value.
macro_rules! env_or {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name).unwrap_or_else(|| $default.to_string())
    };
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://banco-de-dados.db";
pub const DEFAULT_PORT: u16 = 3000;

/// Strongly typed service configuration.
///
/// Immutable after loading; one snapshot for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ---
    /// SQLite database URL (`sqlite://path` or `sqlite::memory:`).
    pub db_url: String,

    /// Maximum number of pooled SQLite connections.
    pub db_pool_max: u32,

    /// Address and port the HTTP listener binds to.
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DATABASE_URL.to_string(),
            db_pool_max: 5,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
        }
    }
}

/// Load the service configuration.
///
/// Optional:
/// - `DATABASE_URL` – SQLite URL (default: `sqlite://banco-de-dados.db`)
/// - `DB_POOL_MAX` – max pooled connections (default: 5)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0`)
/// - `PORT` – listen port (default: 3000)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|key| env::var(key).ok())
}

/// Build a [`Config`] from an arbitrary variable source.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let defaults = Config::default();

    let db_url = env_or!(lookup, "DATABASE_URL", defaults.db_url);
    let db_pool_max = parse_env!(lookup, "DB_POOL_MAX", u32, defaults.db_pool_max);
    let ip = parse_env!(lookup, "BIND_ADDR", IpAddr, defaults.bind_addr.ip());
    let port = parse_env!(lookup, "PORT", u16, defaults.bind_addr.port());

    if db_pool_max == 0 {
        bail!("Invalid DB_POOL_MAX: must be at least 1");
    }

    Ok(Config {
        db_url,
        db_pool_max,
        bind_addr: SocketAddr::new(ip, port),
    })
}

impl Config {
    /// Log the loaded configuration.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL : {}", self.db_url);
        tracing::info!("  DB_POOL_MAX  : {}", self.db_pool_max);
        tracing::info!("  BIND_ADDR    : {}", self.bind_addr);
    }
}

/// Settings for the reading simulator binary.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    // ---
    /// Base URL of the service the simulator posts to.
    pub target_url: String,

    /// Delay between two generated readings.
    pub interval: Duration,

    pub sensor_id: i64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            target_url: format!("http://localhost:{DEFAULT_PORT}"),
            interval: Duration::from_secs(10),
            sensor_id: 1,
        }
    }
}

/// Load the simulator configuration.
///
/// Optional:
/// - `SIMULATOR_TARGET_URL` – service base URL (default: `http://localhost:3000`)
/// - `SIMULATOR_INTERVAL_SECS` – seconds between readings (default: 10)
/// - `SIMULATOR_SENSOR_ID` – sensor id stamped on readings (default: 1)
pub fn load_simulator_from_env() -> Result<SimulatorConfig> {
    load_simulator_from(|key| env::var(key).ok())
}

/// Build a [`SimulatorConfig`] from an arbitrary variable source.
pub fn load_simulator_from<F>(lookup: F) -> Result<SimulatorConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let defaults = SimulatorConfig::default();

    let target_url = env_or!(lookup, "SIMULATOR_TARGET_URL", defaults.target_url);
    let interval_secs = parse_env!(
        lookup,
        "SIMULATOR_INTERVAL_SECS",
        u64,
        defaults.interval.as_secs()
    );
    let sensor_id = parse_env!(lookup, "SIMULATOR_SENSOR_ID", i64, defaults.sensor_id);

    if interval_secs == 0 {
        bail!("Invalid SIMULATOR_INTERVAL_SECS: must be greater than zero");
    }

    Ok(SimulatorConfig {
        target_url: target_url.trim_end_matches('/').to_string(),
        interval: Duration::from_secs(interval_secs),
        sensor_id,
    })
}

impl SimulatorConfig {
    pub fn log_config(&self) {
        // ---
        tracing::info!("Simulator configuration:");
        tracing::info!("  SIMULATOR_TARGET_URL    : {}", self.target_url);
        tracing::info!("  SIMULATOR_INTERVAL_SECS : {}", self.interval.as_secs());
        tracing::info!("  SIMULATOR_SENSOR_ID     : {}", self.sensor_id);
    }
}
