//! View models for the three consumer screens: the live dashboard, the
//! yield/ROI estimator and the daily recap.
//!
//! Each view is rebuilt from scratch on every poll; none holds state of
//! its own. `Display` renders the view as plain text for a terminal.

use crate::{
    estimate::{estimate_from_counts, CostModel, EstimationParams, YieldMetrics},
    format::{format_number, format_payback, format_percent, format_rupiah},
    observation::{Observation, RipenessStatus},
    summary::{daily_recap, StatusCounts},
    types::ObservationId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Green,
    Yellow,
    Red,
}

/// One map pin per observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id:     ObservationId,
    pub lat:    f64,
    pub lng:    f64,
    pub status: RipenessStatus,
    pub color:  MarkerColor,
    pub label:  &'static str,
}

impl MapMarker {
    /// Unknown labels share the overripe pin.
    pub fn from_observation(obs: &Observation) -> Self {
        let (color, label) = match obs.status {
            RipenessStatus::Ripe => (MarkerColor::Green, "Ripe tree"),
            RipenessStatus::Unripe => (MarkerColor::Yellow, "Unripe tree"),
            RipenessStatus::Overripe | RipenessStatus::Other(_) => {
                (MarkerColor::Red, "Overripe tree")
            }
        };
        Self {
            id: obs.id,
            lat: obs.lat,
            lng: obs.lng,
            status: obs.status.clone(),
            color,
            label,
        }
    }
}

// ── Dashboard ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub counts:  StatusCounts,
    /// Percentage of readings with a recognised label.
    pub classified_share: f64,
    pub markers: Vec<MapMarker>,
}

impl DashboardView {
    pub fn build(observations: &[Observation]) -> Self {
        let counts = StatusCounts::tally(observations);
        Self {
            counts,
            classified_share: counts.classified_share(),
            markers: observations.iter().map(MapMarker::from_observation).collect(),
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== PALMCHECK DASHBOARD ===")?;
        writeln!(f, "  ripe:        {}", format_number(self.counts.ripe as f64))?;
        writeln!(f, "  unripe:      {}", format_number(self.counts.unripe as f64))?;
        writeln!(f, "  overripe:    {}", format_number(self.counts.overripe as f64))?;
        writeln!(f, "  classified:  {:.1}%", self.classified_share)?;
        writeln!(f)?;
        if self.markers.is_empty() {
            return writeln!(f, "  (no detections yet)");
        }
        for m in &self.markers {
            writeln!(
                f,
                "  [{:>6}] {:<13} ({:.5}, {:.5}) #{}",
                format!("{:?}", m.color).to_lowercase(),
                m.label,
                m.lat,
                m.lng,
                m.id
            )?;
        }
        Ok(())
    }
}

// ── Yield & ROI ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldView {
    pub counts:     StatusCounts,
    pub ripe_ratio: f64,
    pub params:     EstimationParams,
    pub metrics:    YieldMetrics,
}

impl YieldView {
    pub fn build(observations: &[Observation], params: &EstimationParams) -> Self {
        let counts = StatusCounts::tally(observations);
        Self {
            counts,
            ripe_ratio: counts.ripe_ratio(),
            params: params.clone(),
            metrics: estimate_from_counts(&counts, params),
        }
    }
}

impl fmt::Display for YieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.params;
        let m = &self.metrics;

        writeln!(f, "=== YIELD ESTIMATION & ROI ===")?;
        writeln!(f, "  ripe detected:      {}", format_number(self.counts.ripe as f64))?;
        writeln!(f, "  unripe detected:    {}", format_number(self.counts.unripe as f64))?;
        writeln!(f, "  overripe detected:  {}", format_number(self.counts.overripe as f64))?;
        writeln!(
            f,
            "  ripe ratio:         {} (based on {} readings)",
            format_percent(self.ripe_ratio, 1),
            format_number(self.counts.total as f64)
        )?;

        writeln!(f)?;
        writeln!(f, "-- Per cycle --")?;
        writeln!(
            f,
            "  total trees:        {}  ({} ha x {} trees/ha)",
            format_number(m.total_trees),
            format_number(p.area_ha),
            format_number(p.trees_per_ha)
        )?;
        writeln!(
            f,
            "  ripe bunches:       {}  ({:.1} bunches/tree/cycle)",
            format_number(m.est_ripe_bunches),
            p.bunches_per_tree_per_cycle
        )?;
        writeln!(
            f,
            "  TBS (ton):          {}  ({} kg/bunch)",
            format_number(m.est_tbs_ton),
            format_number(p.avg_bunch_weight_kg)
        )?;
        writeln!(
            f,
            "  CPO (ton):          {}  (OER {}%)",
            format_number(m.est_cpo_ton),
            p.oer_percent
        )?;
        writeln!(
            f,
            "  gross revenue:      {}  (TBS {}/ton)",
            format_rupiah(m.gross_revenue_rp),
            format_rupiah(p.price_tbs_per_ton)
        )?;
        writeln!(
            f,
            "  net, manual:        {}  (loss {}%)",
            format_rupiah(m.net_revenue_manual_rp),
            p.loss_manual_percent
        )?;
        writeln!(
            f,
            "  net, PalmCheck:     {}  (loss {}%)",
            format_rupiah(m.net_revenue_palm_rp),
            p.loss_palmcheck_percent
        )?;
        writeln!(f, "  incremental:        {}", format_rupiah(m.incremental_revenue_rp))?;

        writeln!(f)?;
        writeln!(f, "-- Horizon --")?;
        let cost_basis = match p.cost_model {
            CostModel::Subscription => format!("{} months subscription", p.horizon_months),
            CostModel::Capex => "device CAPEX".to_string(),
        };
        writeln!(f, "  total cost:         {}  ({cost_basis})", format_rupiah(m.total_cost_rp))?;
        writeln!(f, "  ROI:                {}", format_percent(m.roi, 1))?;
        writeln!(f, "  payback:            {}", format_payback(m.payback_months))
    }
}

// ── Daily recap ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecapView {
    pub date:   NaiveDate,
    pub counts: StatusCounts,
}

const BAR_WIDTH: usize = 40;

impl RecapView {
    pub fn build(observations: &[Observation], date: NaiveDate) -> Self {
        Self {
            date,
            counts: daily_recap(observations, date),
        }
    }
}

impl fmt::Display for RecapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== DAILY RECAP {} ===", self.date)?;
        let rows = [
            ("Ripe", self.counts.ripe),
            ("Unripe", self.counts.unripe),
            ("Overripe", self.counts.overripe),
        ];
        let peak = rows.iter().map(|(_, n)| *n).max().unwrap_or(0);
        for (label, n) in rows {
            let width = if peak == 0 { 0 } else { n * BAR_WIDTH / peak };
            writeln!(f, "  {label:<9}{:>6} {}", n, "#".repeat(width))?;
        }
        writeln!(f, "  total:   {:>6}", self.counts.total)
    }
}

// ── View selection ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    Yield,
    Recap,
}

impl ViewKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dashboard" => Some(Self::Dashboard),
            "yield" => Some(Self::Yield),
            "recap" => Some(Self::Recap),
            _ => None,
        }
    }

    /// The live map refreshes every second; the estimator and recap can
    /// afford the slower cadence.
    pub fn poll_interval(&self, config: &crate::config::AppConfig) -> std::time::Duration {
        match self {
            Self::Dashboard => config.dashboard_interval(),
            Self::Yield | Self::Recap => config.yield_interval(),
        }
    }
}
