use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use vitalog_data::{ListFilter, MeasurementStore, StoreConfig};
use vitalog_domain::{classify, Category, Measurement};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[test]
fn test_measurements_survive_a_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vitalog.db");

    {
        let store = MeasurementStore::open(&path).unwrap();
        store.initialize().unwrap();
        store
            .insert(&Measurement::new(128, 84, 76).with_glucose(105))
            .unwrap();
    }

    let store = MeasurementStore::open(&path).unwrap();
    store.initialize().unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].systolic, 128);
    assert_eq!(listed[0].glucose, Some(105));
}

#[test]
fn test_open_creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("data").join("vitalog.db");

    let store = MeasurementStore::open(&path).unwrap();
    store.initialize().unwrap();
    store.insert(&Measurement::new(120, 80, 72)).unwrap();

    assert!(path.exists());
}

#[test]
fn test_open_with_config_uses_the_configured_path() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        path: dir.path().join("configured.db"),
        ..StoreConfig::default()
    };

    let store = MeasurementStore::open_with_config(&config).unwrap();
    store.initialize().unwrap();
    store.insert(&Measurement::new(120, 80, 72)).unwrap();

    assert!(config.path.exists());
}

#[test]
fn test_initialize_again_keeps_existing_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vitalog.db");

    let store = MeasurementStore::open(&path).unwrap();
    store.initialize().unwrap();
    store
        .insert(&Measurement::new(118, 76, 64).with_taken_at(at(1, 8)))
        .unwrap();

    // A second setup run must not disturb the stored data
    store.initialize().unwrap();

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].taken_at, Some(at(1, 8)));
}

#[test]
fn test_full_measurement_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = MeasurementStore::open(dir.path().join("vitalog.db")).unwrap();
    store.initialize().unwrap();

    // Capture a few days of readings
    let first = store
        .insert(&Measurement::new(118, 76, 64).with_taken_at(at(1, 8)))
        .unwrap();
    let second = store
        .insert(
            &Measurement::new(142, 92, 80)
                .with_glucose(130)
                .with_taken_at(at(2, 8)),
        )
        .unwrap();
    store
        .insert(&Measurement::new(127, 79, 70).with_taken_at(at(3, 8)))
        .unwrap();

    // Correct the second reading after a re-measure
    let mut corrected = Measurement::new(138, 88, 78).with_glucose(130);
    corrected.id = Some(second);
    assert!(store.update(&corrected).unwrap());

    // Drop the first one entirely
    assert!(store.delete(first).unwrap());

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].taken_at, Some(at(3, 8)));
    assert_eq!(listed[1].systolic, 138);

    let stats = store.statistics().unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.first_taken_at, Some(at(2, 8)));
    assert_eq!(stats.last_taken_at, Some(at(3, 8)));
}

#[test]
fn test_listed_measurements_classify_for_display() {
    let dir = TempDir::new().unwrap();
    let store = MeasurementStore::open(dir.path().join("vitalog.db")).unwrap();
    store.initialize().unwrap();

    store
        .insert(&Measurement::new(118, 76, 70).with_taken_at(at(1, 8)))
        .unwrap();
    store
        .insert(&Measurement::new(185, 122, 88).with_taken_at(at(1, 20)))
        .unwrap();

    // Newest first, each row classified the way the reading table shows it
    let categories: Vec<Category> = store
        .list_all()
        .unwrap()
        .iter()
        .map(|m| classify(m.systolic, m.diastolic))
        .collect();

    assert_eq!(
        categories,
        vec![Category::HypertensiveCrisis, Category::Normal]
    );
}

#[test]
fn test_recent_window_query() {
    let dir = TempDir::new().unwrap();
    let store = MeasurementStore::open(dir.path().join("vitalog.db")).unwrap();
    store.initialize().unwrap();

    for day in 1..=5 {
        store
            .insert(&Measurement::new(120, 80, 72).with_taken_at(at(day, 8)))
            .unwrap();
    }

    // Last three days, capped at two rows
    let filter = ListFilter {
        since: Some(at(3, 0)),
        limit: Some(2),
        ..Default::default()
    };
    let listed = store.list_filtered(&filter).unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].taken_at, Some(at(5, 8)));
    assert_eq!(listed[1].taken_at, Some(at(4, 8)));
}
