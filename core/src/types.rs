//! Shared primitive types used across the crate.

use chrono::{DateTime, Utc};

/// Identifier assigned to an observation on ingestion.
pub type ObservationId = u64;

/// Identifier of the field device that posted an observation.
pub type DeviceId = String;

/// Receipt time of an observation. Always UTC.
pub type Timestamp = DateTime<Utc>;

/// Device id used when a reading arrives without one.
pub const DEFAULT_DEVICE_ID: &str = "raspi-01";
