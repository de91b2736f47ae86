//! Data models for water-quality readings.
//!
//! Field names on the wire (and in the table) keep the vocabulary used by the
//! existing dashboard and sensor producers: `temperatura`, `salinidade`,
//! `ph`, `oxigenio`, `turbidez`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---

/// Payload accepted by the ingestion endpoints.
///
/// Every field is optional. Values of the wrong JSON type decode to `None`
/// so they end up stored as NULL instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewReading {
    // ---
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sensor_id: Option<i64>,

    #[serde(
        rename = "temperatura",
        alias = "temperature",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub temperature: Option<f64>,

    #[serde(
        rename = "salinidade",
        alias = "salinity",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub salinity: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub ph: Option<f64>,

    #[serde(
        rename = "oxigenio",
        alias = "oxygen",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub oxygen: Option<f64>,

    #[serde(
        rename = "turbidez",
        alias = "turbidity",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub turbidity: Option<f64>,

    /// Client-side capture time. Accepted on the wire but never stored: the
    /// database stamps every row with its own insertion time.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A stored reading as returned by the query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SensorReading {
    // ---
    pub id: i64,
    pub sensor_id: Option<i64>,

    #[serde(rename = "temperatura")]
    #[sqlx(rename = "temperatura")]
    pub temperature: Option<f64>,

    #[serde(rename = "salinidade")]
    #[sqlx(rename = "salinidade")]
    pub salinity: Option<f64>,

    pub ph: Option<f64>,

    #[serde(rename = "oxigenio")]
    #[sqlx(rename = "oxigenio")]
    pub oxygen: Option<f64>,

    #[serde(rename = "turbidez")]
    #[sqlx(rename = "turbidez")]
    pub turbidity: Option<f64>,

    pub timestamp: DateTime<Utc>,
}

// ---

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
