use chrono::{Duration, NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sensor_forecast::error::ForecastError;
use sensor_forecast::{Observation, TimeSeriesData};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 15)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

fn create_test_data() -> TimeSeriesData {
    let timestamps = (0..10).map(|i| t0() + Duration::minutes(30 * i)).collect();
    let values = vec![45.0, 46.0, 47.5, 47.0, 48.0, 49.0, 50.5, 51.0, 50.0, 49.5];
    TimeSeriesData::from_values("humidity", "%", timestamps, values).unwrap()
}

#[rstest]
#[case(-60)]
#[case(0)]
#[case(45)]
#[case(135)]
#[case(270)]
#[case(600)]
fn test_split_partitions_series(#[case] offset_minutes: i64) {
    let data = create_test_data();
    let cutoff = t0() + Duration::minutes(offset_minutes);
    let split = data.split_at(cutoff);

    assert_eq!(split.training.len() + split.validation.len(), data.len());
    assert!(split.training.iter().all(|o| o.timestamp <= cutoff));
    assert!(split.validation.iter().all(|o| o.timestamp > cutoff));

    let mut rejoined: Vec<Observation> = split
        .training
        .iter()
        .chain(split.validation.iter())
        .map(|o| (*o).clone())
        .collect();
    rejoined.sort_by_key(|o| o.timestamp);
    assert_eq!(rejoined, data.observations().to_vec());
}

#[test]
fn test_observation_on_cutoff_is_training() {
    let data = create_test_data();
    let cutoff = t0() + Duration::minutes(60);
    let split = data.split_at(cutoff);

    assert_eq!(split.training.len(), 3);
    assert_eq!(split.last_training().unwrap().timestamp, cutoff);
    assert_eq!(split.training_values(), vec![45.0, 46.0, 47.5]);
}

#[test]
fn test_companions_are_kept_apart() {
    let co2 = vec![
        Observation::new(t0(), 420.0, "ppm"),
        Observation::new(t0() + Duration::minutes(30), 430.0, "ppm"),
    ];
    let data = create_test_data().with_companion("co2", co2.clone());

    assert_eq!(data.len(), 10);
    assert_eq!(data.parameter(), "humidity");
    assert_eq!(data.readings_for("co2").unwrap(), co2.as_slice());
    assert_eq!(data.readings_for("humidity").unwrap().len(), 10);
    assert!(data.readings_for("pressure").is_none());
    assert_eq!(data.companions().len(), 1);
}

#[test]
fn test_slider_position_and_lookback() {
    let data = create_test_data();

    assert_eq!(data.cutoff_at_position(0.0).unwrap(), t0());
    assert_eq!(
        data.cutoff_at_position(0.75).unwrap(),
        t0() + Duration::minutes(30 * 7)
    );
    assert!(matches!(
        data.cutoff_at_position(-0.1),
        Err(ForecastError::InvalidParameter(_))
    ));

    let recent = data.lookback(1.5).unwrap();
    assert_eq!(recent.values(), vec![50.5, 51.0, 50.0, 49.5]);
}

#[rstest]
#[case(1e12)]
#[case(2.5e9)]
fn test_lookback_beyond_timestamp_range(#[case] hours: f64) {
    let data = create_test_data();
    assert!(matches!(
        data.lookback(hours),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_lookback_longer_than_history_keeps_everything() {
    let data = create_test_data();
    let windowed = data.lookback(1e6).unwrap();
    assert_eq!(windowed.values(), data.values());
}

#[test]
fn test_empty_series_windowing() {
    let empty = TimeSeriesData::new("co2", Vec::new());
    assert!(empty.is_empty());
    assert_eq!(empty.first_timestamp(), None);
    assert!(matches!(
        empty.cutoff_at_position(0.5),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        empty.lookback(2.0),
        Err(ForecastError::InsufficientData(_))
    ));

    let summary = empty.summary(t0());
    assert_eq!(summary.training_points, 0);
    assert_eq!(summary.training_mean, None);
}
