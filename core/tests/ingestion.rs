//! Ingestion service tests: presence checks, defaults, ids, ordering.

mod common;

use chrono::{Duration, TimeZone, Utc};
use palmcheck_core::{
    clock::ManualClock,
    error::PalmError,
    ingest::IngestionService,
    observation::{ObservationInput, RipenessStatus},
    store::{MemoryStore, ObservationStore},
};
use std::sync::Arc;

const T0: i64 = 1_717_200_000_000;

fn service_with_clock() -> (IngestionService, Arc<MemoryStore>, Arc<ManualClock>) {
    common::init_logging();
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::at_millis(T0));
    let service = IngestionService::with_clock(store.clone(), clock.clone()).unwrap();
    (service, store, clock)
}

#[test]
fn missing_device_id_gets_default() {
    let (service, store, _) = service_with_clock();

    let stored = service
        .record(ObservationInput::new(-7.27, 112.79, "ripe"))
        .unwrap();

    assert_eq!(stored.device_id, "raspi-01");
    assert_eq!(stored.status, RipenessStatus::Ripe);
    assert_eq!(stored.lat, -7.27);
    assert_eq!(stored.lng, 112.79);
    assert_eq!(stored.timestamp, Utc.timestamp_millis_opt(T0).unwrap());
    assert_eq!(stored.id, T0 as u64);
    assert_eq!(store.len(), 1);
}

#[test]
fn empty_device_id_is_treated_as_missing() {
    let (service, _, _) = service_with_clock();
    let service = service.with_default_device_id("block-a");

    let stored = service
        .record(ObservationInput::new(-7.27, 112.79, "unripe").with_device(""))
        .unwrap();
    assert_eq!(stored.device_id, "block-a");

    let stored = service
        .record(ObservationInput::new(-7.27, 112.79, "unripe").with_device("raspi-07"))
        .unwrap();
    assert_eq!(stored.device_id, "raspi-07");
}

#[test]
fn missing_status_is_rejected_and_not_stored() {
    let (service, store, _) = service_with_clock();

    let input = ObservationInput {
        lat: Some(-7.27),
        lng: Some(112.79),
        ..ObservationInput::default()
    };
    let err = service.record(input).unwrap_err();

    match &err {
        PalmError::MissingFields { missing } => assert_eq!(missing, &vec!["status"]),
        other => panic!("expected MissingFields, got {other:?}"),
    }
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "Missing required fields");
    assert!(store.is_empty());
}

#[test]
fn falsy_values_count_as_missing() {
    let (service, store, _) = service_with_clock();

    let cases = [
        (ObservationInput::new(0.0, 112.79, "ripe"), vec!["lat"]),
        (ObservationInput::new(-7.27, 0.0, "ripe"), vec!["lng"]),
        (ObservationInput::new(-7.27, 112.79, ""), vec!["status"]),
        (ObservationInput::default(), vec!["lat", "lng", "status"]),
    ];

    for (input, expected) in cases {
        match service.record(input) {
            Err(PalmError::MissingFields { missing }) => assert_eq!(missing, expected),
            other => panic!("expected MissingFields {expected:?}, got {other:?}"),
        }
    }
    assert!(store.is_empty());
}

#[test]
fn unknown_status_label_is_kept_verbatim() {
    let (service, _, _) = service_with_clock();

    let stored = service
        .record(ObservationInput::new(-7.27, 112.79, "rotten"))
        .unwrap();

    assert_eq!(stored.status, RipenessStatus::Other("rotten".into()));
    assert_eq!(stored.status.as_str(), "rotten");
}

#[test]
fn list_returns_insertion_order() {
    let (service, _, clock) = service_with_clock();

    for status in ["ripe", "unripe", "overripe", "ripe"] {
        service.record(ObservationInput::new(-7.27, 112.79, status)).unwrap();
        clock.advance(Duration::seconds(1));
    }

    let statuses: Vec<String> = service
        .list()
        .unwrap()
        .into_iter()
        .map(|o| o.status.to_string())
        .collect();
    assert_eq!(statuses, ["ripe", "unripe", "overripe", "ripe"]);
}

#[test]
fn rapid_writes_in_one_millisecond_get_unique_increasing_ids() {
    let (service, _, _) = service_with_clock();

    let ids: Vec<u64> = (0..50)
        .map(|_| {
            service
                .record(ObservationInput::new(-7.27, 112.79, "ripe"))
                .unwrap()
                .id
        })
        .collect();

    assert!(ids.windows(2).all(|w| w[1] > w[0]), "ids not strictly increasing: {ids:?}");
}

#[test]
fn ids_resume_above_existing_records() {
    let store = Arc::new(MemoryStore::new());
    store.append(common::obs(T0 as u64 + 10_000, "ripe")).unwrap();

    let clock = Arc::new(ManualClock::at_millis(T0));
    let service = IngestionService::with_clock(store, clock).unwrap();

    let stored = service
        .record(ObservationInput::new(-7.27, 112.79, "ripe"))
        .unwrap();
    assert_eq!(stored.id, T0 as u64 + 10_001);
}
