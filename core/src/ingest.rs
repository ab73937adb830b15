//! Ingestion and query of ripeness observations.
//!
//! Presence is the only check. A field counts as missing when it is
//! absent, null, zero (for coordinates) or empty (for the status label).
//! Ids follow call order; under concurrent writes the stored list may
//! hold them out of numeric order.
//! A missing device id is not an error; the configured default is used.

use crate::{
    clock::{Clock, SystemClock},
    error::{PalmError, PalmResult},
    ids::IdGenerator,
    observation::{Observation, ObservationInput, RipenessStatus},
    store::ObservationStore,
    types::DEFAULT_DEVICE_ID,
};
use std::sync::Arc;

pub struct IngestionService {
    store:             Arc<dyn ObservationStore>,
    clock:             Arc<dyn Clock>,
    ids:               IdGenerator,
    default_device_id: String,
}

impl IngestionService {
    pub fn new(store: Arc<dyn ObservationStore>) -> PalmResult<Self> {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Id generation resumes above the highest id already in `store`.
    pub fn with_clock(store: Arc<dyn ObservationStore>, clock: Arc<dyn Clock>) -> PalmResult<Self> {
        let ids = match store.last_id()? {
            Some(last) => IdGenerator::starting_after(last),
            None => IdGenerator::new(),
        };
        Ok(Self {
            store,
            clock,
            ids,
            default_device_id: DEFAULT_DEVICE_ID.to_string(),
        })
    }

    pub fn with_default_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.default_device_id = device_id.into();
        self
    }

    /// Validate presence, stamp id and receipt time, append, and return
    /// the stored record.
    pub fn record(&self, input: ObservationInput) -> PalmResult<Observation> {
        let ObservationInput { device_id, lat, lng, status } = input;

        let lat = lat.filter(|v| is_truthy(*v));
        let lng = lng.filter(|v| is_truthy(*v));
        let status = status.filter(|s| !s.is_empty());

        let mut missing = Vec::new();
        if lat.is_none() {
            missing.push("lat");
        }
        if lng.is_none() {
            missing.push("lng");
        }
        if status.is_none() {
            missing.push("status");
        }

        let (Some(lat), Some(lng), Some(status)) = (lat, lng, status) else {
            log::warn!("Rejected observation: missing {}", missing.join(", "));
            return Err(PalmError::MissingFields { missing });
        };

        let timestamp = self.clock.now();
        let observation = Observation {
            id: self.ids.next(timestamp),
            device_id: device_id
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| self.default_device_id.clone()),
            lat,
            lng,
            status: RipenessStatus::from(status),
            timestamp,
        };

        self.store.append(observation.clone())?;
        log::info!(
            "Observation {} from {}: {} at ({}, {})",
            observation.id,
            observation.device_id,
            observation.status,
            observation.lat,
            observation.lng
        );
        Ok(observation)
    }

    /// The full observation set, in insertion order.
    pub fn list(&self) -> PalmResult<Vec<Observation>> {
        self.store.list_all()
    }

    pub fn store(&self) -> &Arc<dyn ObservationStore> {
        &self.store
    }
}

/// Zero and NaN are falsy coordinates.
fn is_truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}
