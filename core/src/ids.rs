//! Observation id generation.
//!
//! Ids are millisecond timestamps bumped forward on collision, strictly
//! increasing in the order `next` is called within a process. An id is
//! taken before the record reaches the store, so concurrent writers may
//! append out of id order: list order is insertion order, not id order.
//! Seed with `starting_after(store.last_id())` when resuming from a
//! persistent store.

use crate::types::{ObservationId, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every id handed out will be greater than `last`.
    pub fn starting_after(last: ObservationId) -> Self {
        Self { last: AtomicU64::new(last) }
    }

    /// Next id for an observation received at `now`.
    pub fn next(&self, now: Timestamp) -> ObservationId {
        let now_ms = now.timestamp_millis().max(0) as u64;
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now_ms.max(prev.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn same_millisecond_yields_distinct_ids() {
        let ids = IdGenerator::new();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let a = ids.next(now);
        let b = ids.next(now);
        let c = ids.next(now);

        assert_eq!(a, 1_700_000_000_000);
        assert_eq!(b, a + 1);
        assert_eq!(c, a + 2);
    }

    #[test]
    fn clock_going_backwards_never_reuses_an_id() {
        let ids = IdGenerator::new();
        let later = Utc.timestamp_millis_opt(2_000).unwrap();
        let earlier = Utc.timestamp_millis_opt(1_000).unwrap();

        let a = ids.next(later);
        let b = ids.next(earlier);
        assert!(b > a, "id went backwards: {a} then {b}");
    }

    #[test]
    fn resumes_above_stored_id() {
        let ids = IdGenerator::starting_after(5_000);
        let now = Utc.timestamp_millis_opt(10).unwrap();
        assert_eq!(ids.next(now), 5_001);
    }

    #[test]
    fn concurrent_callers_get_unique_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let ids = Arc::new(IdGenerator::new());
        let now = Utc.timestamp_millis_opt(42).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.next(now)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
