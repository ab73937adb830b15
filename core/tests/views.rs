//! View model and rendering tests.

mod common;

use chrono::NaiveDate;
use common::{obs_at, observations};
use palmcheck_core::{
    config::AppConfig,
    estimate::EstimationParams,
    format::PLACEHOLDER,
    summary::counts_by_day,
    views::{DashboardView, MarkerColor, RecapView, ViewKind, YieldView},
};
use std::time::Duration;

// 2024-06-01T00:00:00Z and the following day.
const JUNE_1: i64 = 1_717_200_000_000;
const JUNE_2: i64 = JUNE_1 + 86_400_000;

#[test]
fn dashboard_counts_and_markers() {
    let obs = observations(&["ripe", "unripe", "overripe", "ripe", "sensor-glitch"]);
    let view = DashboardView::build(&obs);

    assert_eq!(view.counts.ripe, 2);
    assert_eq!(view.counts.unripe, 1);
    assert_eq!(view.counts.overripe, 1);
    assert_eq!(view.counts.total, 5);
    assert!((view.classified_share - 80.0).abs() < 1e-9);

    let colors: Vec<MarkerColor> = view.markers.iter().map(|m| m.color).collect();
    assert_eq!(
        colors,
        [MarkerColor::Green, MarkerColor::Yellow, MarkerColor::Red, MarkerColor::Green, MarkerColor::Red]
    );
    assert_eq!(view.markers[1].label, "Unripe tree");
}

#[test]
fn empty_dashboard_renders_without_markers() {
    let text = DashboardView::build(&[]).to_string();
    assert!(text.contains("no detections yet"));
    assert!(text.contains("classified:  0.0%"));
}

#[test]
fn yield_view_renders_placeholder_for_missing_payback() {
    let obs = observations(&["unripe", "overripe"]);
    let view = YieldView::build(&obs, &EstimationParams::default());

    assert_eq!(view.ripe_ratio, 0.0);
    assert!(view.metrics.payback_months.is_infinite());

    let text = view.to_string();
    assert!(text.contains(&format!("payback:            {PLACEHOLDER}")), "{text}");
    assert!(!text.contains("inf"), "{text}");
    assert!(text.contains("0.0% (based on 2 readings)"), "{text}");
}

#[test]
fn yield_view_renders_locale_numbers() {
    let obs = observations(&["ripe", "ripe", "unripe", "overripe"]);
    let text = YieldView::build(&obs, &EstimationParams::default()).to_string();

    assert!(text.contains("total trees:        1.360"), "{text}");
    assert!(text.contains("ripe bunches:       652,8"), "{text}");
    assert!(text.contains("TBS (ton):          13,06"), "{text}");
    assert!(text.contains("12 months subscription"), "{text}");
}

#[test]
fn recap_only_counts_the_selected_day() {
    let obs = vec![
        obs_at(1, "ripe", JUNE_1 + 1_000),
        obs_at(2, "unripe", JUNE_1 + 2_000),
        obs_at(3, "ripe", JUNE_2 + 1_000),
        obs_at(4, "overripe", JUNE_2 + 2_000),
        obs_at(5, "ripe", JUNE_2 + 3_000),
    ];
    let june_2 = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    let view = RecapView::build(&obs, june_2);

    assert_eq!(view.counts.ripe, 2);
    assert_eq!(view.counts.unripe, 0);
    assert_eq!(view.counts.overripe, 1);
    assert_eq!(view.counts.total, 3);

    let text = view.to_string();
    assert!(text.contains("2024-06-02"));
    assert!(text.contains(&"#".repeat(40)), "peak bar should be full width: {text}");

    let days = counts_by_day(&obs);
    assert_eq!(days.len(), 2);
    assert_eq!(days.values().map(|c| c.total).sum::<usize>(), 5);
}

#[test]
fn views_poll_at_their_own_cadence() {
    let config = AppConfig::default();
    assert_eq!(ViewKind::Dashboard.poll_interval(&config), Duration::from_secs(1));
    assert_eq!(ViewKind::Yield.poll_interval(&config), Duration::from_secs(5));
    assert_eq!(ViewKind::parse("recap"), Some(ViewKind::Recap));
    assert_eq!(ViewKind::parse("map"), None);
}
