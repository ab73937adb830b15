//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use palmcheck_core::observation::{Observation, RipenessStatus};

pub fn obs(id: u64, status: &str) -> Observation {
    obs_at(id, status, 1_700_000_000_000 + id as i64)
}

pub fn obs_at(id: u64, status: &str, millis: i64) -> Observation {
    Observation {
        id,
        device_id: "raspi-01".into(),
        lat: -7.27,
        lng: 112.79,
        status: RipenessStatus::from(status),
        timestamp: Utc.timestamp_millis_opt(millis).unwrap(),
    }
}

pub fn observations(statuses: &[&str]) -> Vec<Observation> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, s)| obs(i as u64 + 1, s))
        .collect()
}

/// Relative comparison for values produced by chained float arithmetic.
pub fn approx_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}

/// Route `log` output through the test harness; `RUST_LOG=debug` to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
