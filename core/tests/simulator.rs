//! Device simulator tests.

use palmcheck_core::{config::SimulatorConfig, simulator::DeviceSimulator};

#[test]
fn same_seed_produces_identical_readings() {
    let a: Vec<_> = DeviceSimulator::new(0xC0FFEE, SimulatorConfig::default()).take(100).collect();
    let b: Vec<_> = DeviceSimulator::new(0xC0FFEE, SimulatorConfig::default()).take(100).collect();
    assert_eq!(a, b);

    let c: Vec<_> = DeviceSimulator::new(1, SimulatorConfig::default()).take(100).collect();
    assert_ne!(a, c, "different seeds should diverge");
}

#[test]
fn readings_stay_within_jitter_of_centre() {
    let config = SimulatorConfig::default();
    let mut sim = DeviceSimulator::new(42, config.clone());

    for _ in 0..500 {
        let input = sim.next_input();
        let lat = input.lat.expect("lat");
        let lng = input.lng.expect("lng");
        assert!((lat - config.center_lat).abs() <= config.jitter_deg);
        assert!((lng - config.center_lng).abs() <= config.jitter_deg);
        assert!(input.device_id.is_none());
    }
    assert_eq!(sim.emitted(), 500);
}

#[test]
fn status_weights_are_respected() {
    let only_unripe = SimulatorConfig {
        ripe_weight: 0.0,
        unripe_weight: 1.0,
        overripe_weight: 0.0,
        ..SimulatorConfig::default()
    };
    let sim = DeviceSimulator::new(9, only_unripe);
    assert!(sim.take(200).all(|i| i.status.as_deref() == Some("unripe")));

    let mixed = DeviceSimulator::new(9, SimulatorConfig::default());
    let ripe = mixed
        .take(2000)
        .filter(|i| i.status.as_deref() == Some("ripe"))
        .count();
    // Default weight is 0.5; allow a wide band.
    assert!((800..=1200).contains(&ripe), "ripe count {ripe}");
}

#[test]
fn configured_device_id_is_sent() {
    let config = SimulatorConfig {
        device_id: Some("raspi-09".into()),
        ..SimulatorConfig::default()
    };
    let input = DeviceSimulator::new(3, config).next_input();
    assert_eq!(input.device_id.as_deref(), Some("raspi-09"));
}
