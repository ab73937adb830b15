//! Ripeness observations as posted by field devices and held by the store.

use crate::types::{DeviceId, ObservationId, Timestamp};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Ripeness classification of a detected fruit bunch.
///
/// The three known labels drive every count and estimate. Any other label
/// is kept verbatim: ingestion only checks presence, so an unexpected
/// label still counts toward the total but lands in no bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RipenessStatus {
    Ripe,
    Unripe,
    Overripe,
    Other(String),
}

impl RipenessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ripe => "ripe",
            Self::Unripe => "unripe",
            Self::Overripe => "overripe",
            Self::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for RipenessStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "ripe" => Self::Ripe,
            "unripe" => Self::Unripe,
            "overripe" => Self::Overripe,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for RipenessStatus {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<RipenessStatus> for String {
    fn from(status: RipenessStatus) -> Self {
        match status {
            RipenessStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RipenessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored observation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id:        ObservationId,
    pub device_id: DeviceId,
    pub lat:       f64,
    pub lng:       f64,
    pub status:    RipenessStatus,
    pub timestamp: Timestamp,
}

/// Request body of `POST /observations`. Every field is optional at the
/// type level; the ingestion service decides what is missing.
///
/// Devices are loose about JSON types, so decoding only rejects what
/// cannot become a record at all. Falsy values (`null`, `false`, `0`,
/// `""`) decode to `None`. Coordinates may arrive as numbers or numeric
/// strings. Labels may be any truthy value and keep their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservationInput {
    #[serde(default, deserialize_with = "truthy_label", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "truthy_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "truthy_coordinate")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "truthy_label")]
    pub status: Option<String>,
}

impl ObservationInput {
    pub fn new(lat: f64, lng: f64, status: impl Into<String>) -> Self {
        Self {
            device_id: None,
            lat: Some(lat),
            lng: Some(lng),
            status: Some(status.into()),
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v == 0.0 || v.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn truthy_coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    if is_falsy(&value) {
        return Ok(None);
    }
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid coordinate {value}")))
}

fn truthy_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(match value {
        v if is_falsy(&v) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
