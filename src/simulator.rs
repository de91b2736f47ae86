//! Synthetic reading producer.
//!
//! Posts plausible seawater readings to a running service at a fixed
//! interval, the same way a field sensor would. Useful for demos and for
//! exercising the dashboard without hardware attached.

use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::scheduler::PeriodicTask;
use crate::NewReading;

// ---

pub const TEMPERATURE_RANGE: Range<f64> = 20.0..24.0;
pub const SALINITY_RANGE: Range<f64> = 30.0..36.0;
pub const PH_RANGE: Range<f64> = 7.5..8.6;
pub const OXYGEN_RANGE: Range<f64> = 8.8..9.4;
pub const TURBIDITY_RANGE: Range<f64> = 42.09..215.16;

/// Draw one reading with every field populated.
pub fn generate_reading<R: Rng + ?Sized>(
    rng: &mut R,
    sensor_id: i64,
    now: DateTime<Utc>,
) -> NewReading {
    // ---
    NewReading {
        sensor_id: Some(sensor_id),
        temperature: Some(rng.gen_range(TEMPERATURE_RANGE)),
        salinity: Some(rng.gen_range(SALINITY_RANGE)),
        ph: Some(rng.gen_range(PH_RANGE)),
        oxygen: Some(rng.gen_range(OXYGEN_RANGE)),
        turbidity: Some(rng.gen_range(TURBIDITY_RANGE)),
        timestamp: Some(now),
    }
}

#[derive(Debug, Clone)]
pub struct Simulator {
    client: reqwest::Client,
    endpoint: String,
    sensor_id: i64,
}

impl Simulator {
    /// `target_url` is the service base URL, e.g. `http://localhost:3000`.
    pub fn new(target_url: &str, sensor_id: i64) -> Self {
        // ---
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/inserir-dados-sensor", target_url.trim_end_matches('/')),
            sensor_id,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate and post a single reading.
    pub async fn send_once(&self) -> Result<NewReading> {
        // ---
        let reading = generate_reading(&mut rand::thread_rng(), self.sensor_id, Utc::now());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&reading)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{} answered {}: {}", self.endpoint, status, body);
        }

        tracing::debug!("Simulated reading sent: {:?}", reading);
        Ok(reading)
    }

    /// Schedule [`Self::send_once`] on `task` every `period`.
    ///
    /// Failures are logged and the schedule keeps going. Returns `false`
    /// if `task` was already running.
    pub fn start(self, task: &PeriodicTask, period: Duration) -> bool {
        // ---
        let simulator = Arc::new(self);
        task.start(period, move || {
            let simulator = simulator.clone();
            async move {
                if let Err(e) = simulator.send_once().await {
                    tracing::warn!("Simulated reading not delivered: {:#}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_values_stay_in_range() {
        // ---
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();

        for _ in 0..500 {
            let r = generate_reading(&mut rng, 4, now);

            assert_eq!(r.sensor_id, Some(4));
            assert_eq!(r.timestamp, Some(now));
            assert!(TEMPERATURE_RANGE.contains(&r.temperature.unwrap()));
            assert!(SALINITY_RANGE.contains(&r.salinity.unwrap()));
            assert!(PH_RANGE.contains(&r.ph.unwrap()));
            assert!(OXYGEN_RANGE.contains(&r.oxygen.unwrap()));
            assert!(TURBIDITY_RANGE.contains(&r.turbidity.unwrap()));
        }
    }

    #[test]
    fn test_generated_payload_uses_wire_names() {
        // ---
        let mut rng = StdRng::seed_from_u64(1);
        let reading = generate_reading(&mut rng, 1, Utc::now());

        let value = serde_json::to_value(&reading).unwrap();
        for key in ["sensor_id", "temperatura", "salinidade", "ph", "oxigenio", "turbidez", "timestamp"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }

        let back: NewReading = serde_json::from_value(value).unwrap();
        assert_eq!(back.sensor_id, reading.sensor_id);
        assert_eq!(back.ph, reading.ph);
    }

    #[test]
    fn test_endpoint_path() {
        // ---
        assert_eq!(
            Simulator::new("http://localhost:3000/", 1).endpoint(),
            "http://localhost:3000/inserir-dados-sensor"
        );
    }

    #[tokio::test]
    async fn test_send_once_reports_unreachable_target() {
        // ---
        let simulator = Simulator::new("http://127.0.0.1:9", 1);

        assert!(simulator.send_once().await.is_err());
    }
}
