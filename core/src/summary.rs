//! Aggregate counts over an observation set.

use crate::observation::{Observation, RipenessStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub ripe:     usize,
    pub unripe:   usize,
    pub overripe: usize,
    /// All observations, including ones with an unrecognised label.
    pub total:    usize,
}

impl StatusCounts {
    pub fn tally<'a, I>(observations: I) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let mut counts = Self::default();
        for obs in observations {
            counts.add(&obs.status);
        }
        counts
    }

    pub fn add(&mut self, status: &RipenessStatus) {
        match status {
            RipenessStatus::Ripe => self.ripe += 1,
            RipenessStatus::Unripe => self.unripe += 1,
            RipenessStatus::Overripe => self.overripe += 1,
            RipenessStatus::Other(_) => {}
        }
        self.total += 1;
    }

    /// Fraction of observations classified ripe. Zero for an empty set.
    pub fn ripe_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.ripe as f64 / self.total as f64
    }

    /// Percentage of observations carrying one of the three known labels.
    pub fn classified_share(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.ripe + self.unripe + self.overripe) as f64 / self.total as f64 * 100.0
    }
}

/// Counts for observations received on `date` (UTC).
pub fn daily_recap(observations: &[Observation], date: NaiveDate) -> StatusCounts {
    StatusCounts::tally(
        observations
            .iter()
            .filter(|obs| obs.timestamp.date_naive() == date),
    )
}

/// Counts per UTC receipt date, oldest first.
pub fn counts_by_day(observations: &[Observation]) -> BTreeMap<NaiveDate, StatusCounts> {
    let mut days: BTreeMap<NaiveDate, StatusCounts> = BTreeMap::new();
    for obs in observations {
        days.entry(obs.timestamp.date_naive())
            .or_default()
            .add(&obs.status);
    }
    days
}
