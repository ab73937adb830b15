//! Configuration loading tests.

use palmcheck_core::{
    config::{load_params, AppConfig},
    estimate::CostModel,
};
use std::io::Write;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_keeps_defaults() {
    let file = write_temp(
        r#"{
            "bind_address": "127.0.0.1:8080",
            "database": "palmcheck.db",
            "params": { "areaHa": 42, "costModel": "capex" }
        }"#,
    );

    let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.bind_address, "127.0.0.1:8080");
    assert_eq!(config.database.as_deref(), Some("palmcheck.db"));
    assert_eq!(config.default_device_id, "raspi-01");
    assert_eq!(config.dashboard_poll_ms, 1_000);
    assert_eq!(config.params.area_ha, 42.0);
    assert_eq!(config.params.cost_model, CostModel::Capex);
    assert_eq!(config.params.oer_percent, 21.0);
    assert_eq!(config.simulator.center_lat, -7.27);
}

#[test]
fn missing_file_names_the_path() {
    let err = AppConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"), "{err}");
}

#[test]
fn no_path_means_defaults() {
    assert_eq!(AppConfig::load_or_default(None).unwrap(), AppConfig::default());
}

#[test]
fn params_file_loads_standalone() {
    let file = write_temp(r#"{ "priceTbsPerTon": 2500000, "horizonMonths": 24 }"#);
    let params = load_params(file.path().to_str().unwrap()).unwrap();

    assert_eq!(params.price_tbs_per_ton, 2_500_000.0);
    assert_eq!(params.horizon_months, 24.0);
    assert_eq!(params.area_ha, 10.0);
}
