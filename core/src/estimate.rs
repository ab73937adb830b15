//! Yield and ROI estimation.
//!
//! A pure function of (ripe ratio, parameters). No state, no I/O, no
//! errors: extreme inputs flow through IEEE arithmetic and come out as
//! NaN or infinity, which the formatting layer renders as a placeholder.
//!
//! Only the percentage inputs for coverage and losses are clamped into
//! [0, 100]. Everything else (negative area, zero horizon, ...) is taken
//! as given.

use crate::{observation::Observation, summary::StatusCounts};
use serde::{Deserialize, Serialize};

/// Harvest cycles per month assumed when projecting per-cycle revenue
/// over a horizon expressed in months. ROI and payback both rely on it.
pub const CYCLES_PER_MONTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    /// Monthly fee paid for every month of the horizon.
    #[default]
    Subscription,
    /// One upfront device purchase, independent of the horizon.
    Capex,
}

/// User-tunable agronomic and economic inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimationParams {
    // Plantation scale
    pub area_ha:        f64,
    pub trees_per_ha:   f64,
    // Harvest cycle
    pub bunches_per_tree_per_cycle: f64,
    pub coverage_percent:           f64,
    // Weight and extraction
    pub avg_bunch_weight_kg: f64,
    pub oer_percent:         f64,
    // Price, Rp per ton of TBS
    pub price_tbs_per_ton: f64,
    // Loss without and with detection
    pub loss_manual_percent:    f64,
    pub loss_palmcheck_percent: f64,
    // Cost and horizon
    pub cost_model:              CostModel,
    pub monthly_subscription_rp: f64,
    pub device_capex_rp:         f64,
    pub horizon_months:          f64,
}

impl Default for EstimationParams {
    fn default() -> Self {
        Self {
            area_ha: 10.0,
            trees_per_ha: 136.0,
            bunches_per_tree_per_cycle: 1.2,
            coverage_percent: 80.0,
            avg_bunch_weight_kg: 20.0,
            oer_percent: 21.0,
            price_tbs_per_ton: 2_000_000.0,
            loss_manual_percent: 15.0,
            loss_palmcheck_percent: 7.0,
            cost_model: CostModel::Subscription,
            monthly_subscription_rp: 3_000_000.0,
            device_capex_rp: 50_000_000.0,
            horizon_months: 12.0,
        }
    }
}

/// Derived per-cycle yield figures plus horizon-level cost and ROI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldMetrics {
    pub total_trees:      f64,
    pub est_ripe_bunches: f64,
    pub est_tbs_ton:      f64,
    pub est_cpo_ton:      f64,
    pub gross_revenue_rp:       f64,
    pub net_revenue_manual_rp:  f64,
    pub net_revenue_palm_rp:    f64,
    pub incremental_revenue_rp: f64,
    pub total_cost_rp:  f64,
    pub roi:            f64,
    /// `f64::INFINITY` when there is no incremental revenue.
    pub payback_months: f64,
}

/// Clamp a percentage into [0, 100] and return it as a fraction.
pub fn percent_fraction(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0) / 100.0
}

pub fn estimate(observations: &[Observation], params: &EstimationParams) -> YieldMetrics {
    estimate_from_counts(&StatusCounts::tally(observations), params)
}

pub fn estimate_from_counts(counts: &StatusCounts, params: &EstimationParams) -> YieldMetrics {
    estimate_from_ratio(counts.ripe_ratio(), params)
}

pub fn estimate_from_ratio(ripe_ratio: f64, params: &EstimationParams) -> YieldMetrics {
    // ── Yield ──────────────────────────────────────────────

    let total_trees = params.area_ha * params.trees_per_ha;
    let coverage = percent_fraction(params.coverage_percent);

    let est_ripe_bunches =
        total_trees * ripe_ratio * params.bunches_per_tree_per_cycle * coverage;
    let est_tbs_ton = est_ripe_bunches * params.avg_bunch_weight_kg / 1000.0;
    let est_cpo_ton = est_tbs_ton * (params.oer_percent / 100.0);

    // ── Revenue ────────────────────────────────────────────

    let gross_revenue_rp = est_tbs_ton * params.price_tbs_per_ton;

    let loss_manual = percent_fraction(params.loss_manual_percent);
    let loss_palm = percent_fraction(params.loss_palmcheck_percent);

    let net_revenue_manual_rp = gross_revenue_rp * (1.0 - loss_manual);
    let net_revenue_palm_rp = gross_revenue_rp * (1.0 - loss_palm);
    // f64::max would swallow a NaN difference; keep it so it renders as unavailable.
    let difference = net_revenue_palm_rp - net_revenue_manual_rp;
    let incremental_revenue_rp = if difference.is_nan() { difference } else { difference.max(0.0) };

    // ── Cost ───────────────────────────────────────────────

    let (total_cost_rp, monthly_outlay) = match params.cost_model {
        CostModel::Subscription => (
            params.monthly_subscription_rp * params.horizon_months,
            params.monthly_subscription_rp,
        ),
        CostModel::Capex => (params.device_capex_rp, params.device_capex_rp),
    };

    // ── ROI & payback ──────────────────────────────────────

    let monthly_incremental = incremental_revenue_rp * CYCLES_PER_MONTH;

    let roi = if total_cost_rp > 0.0 {
        (monthly_incremental * params.horizon_months - total_cost_rp) / total_cost_rp
    } else {
        0.0
    };

    let payback_months = if monthly_incremental > 0.0 {
        monthly_outlay / monthly_incremental
    } else {
        f64::INFINITY
    };

    YieldMetrics {
        total_trees,
        est_ripe_bunches,
        est_tbs_ton,
        est_cpo_ton,
        gross_revenue_rp,
        net_revenue_manual_rp,
        net_revenue_palm_rp,
        incremental_revenue_rp,
        total_cost_rp,
        roi,
        payback_months,
    }
}
