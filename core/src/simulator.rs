//! Synthetic field device.
//!
//! Produces observation payloads the way a detection unit walking a
//! block would: positions scattered around a centre point, statuses drawn
//! from fixed weights. It classifies nothing.
//!
//! RULE: Never seeded from the platform RNG. The same seed always yields
//! the same stream of readings, so demos and tests are reproducible.

use crate::{config::SimulatorConfig, observation::ObservationInput, observation::RipenessStatus};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct DeviceSimulator {
    config:  SimulatorConfig,
    inner:   Pcg64Mcg,
    emitted: u64,
}

impl DeviceSimulator {
    pub fn new(seed: u64, config: SimulatorConfig) -> Self {
        Self {
            config,
            inner: Pcg64Mcg::seed_from_u64(seed),
            emitted: 0,
        }
    }

    /// Readings produced so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn next_input(&mut self) -> ObservationInput {
        let lat = self.config.center_lat + self.offset();
        let lng = self.config.center_lng + self.offset();
        let status = self.pick_status();
        self.emitted += 1;

        let input = ObservationInput::new(lat, lng, String::from(status));
        match &self.config.device_id {
            Some(device) => input.with_device(device.clone()),
            None => input,
        }
    }

    /// Roll a float in [0.0, 1.0).
    fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn offset(&mut self) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * self.config.jitter_deg
    }

    fn pick_status(&mut self) -> RipenessStatus {
        let weights = [
            (RipenessStatus::Ripe, self.config.ripe_weight.max(0.0)),
            (RipenessStatus::Unripe, self.config.unripe_weight.max(0.0)),
            (RipenessStatus::Overripe, self.config.overripe_weight.max(0.0)),
        ];
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if !(total > 0.0 && total.is_finite()) {
            return RipenessStatus::Ripe;
        }

        let mut roll = self.next_f64() * total;
        let mut fallback = RipenessStatus::Ripe;
        for (status, weight) in weights {
            if weight <= 0.0 {
                continue;
            }
            if roll < weight {
                return status;
            }
            roll -= weight;
            fallback = status;
        }
        // Rounding can leave `roll` a hair above the last bucket.
        fallback
    }
}

impl Iterator for DeviceSimulator {
    type Item = ObservationInput;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_input())
    }
}
