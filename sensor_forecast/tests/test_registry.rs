use chrono::{Duration, NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sensor_forecast::error::{ForecastError, Result};
use sensor_forecast::models::{ConstantPredictor, Forecast, LinearTrendPredictor, Predictor};
use sensor_forecast::{ForecastConfig, ModelRegistry, TimeSeriesData};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Always fails, whatever the input
#[derive(Debug)]
struct BrokenPredictor;

impl Predictor for BrokenPredictor {
    fn name(&self) -> &str {
        "Broken"
    }

    fn predict(
        &self,
        _series: &TimeSeriesData,
        _cutoff: NaiveDateTime,
        _horizon_hours: f64,
        _num_points: usize,
    ) -> Result<Forecast> {
        Err(ForecastError::Artifact("model exploded".to_string()))
    }
}

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 3)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn series() -> TimeSeriesData {
    let timestamps = (0..6).map(|i| t0() + Duration::minutes(5 * i)).collect();
    TimeSeriesData::from_values(
        "co2",
        "ppm",
        timestamps,
        vec![410.0, 415.0, 420.0, 430.0, 445.0, 460.0],
    )
    .unwrap()
}

fn counting_registry(calls: Arc<AtomicUsize>) -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .register("Counted", move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ConstantPredictor::new()) as Arc<dyn Predictor>)
        })
        .unwrap();
    registry
}

#[test]
fn test_failing_model_falls_back_to_constant() {
    let mut registry = ModelRegistry::new();
    registry
        .register_instance("Broken", Arc::new(BrokenPredictor))
        .unwrap();

    let data = series();
    let cutoff = t0() + Duration::minutes(10);
    let forecast = registry.predict("Broken", &data, cutoff, 1.0, 4).unwrap();
    let expected = ConstantPredictor::new()
        .predict(&data, cutoff, 1.0, 4)
        .unwrap();

    assert_eq!(forecast, expected);
    assert!(forecast.values().iter().all(|&v| v == 420.0));
}

#[test]
fn test_fallback_with_empty_prefix_uses_last_reading() {
    let registry = ModelRegistry::with_defaults(&ForecastConfig::default()).unwrap();
    let data = series();
    let cutoff = t0() - Duration::hours(1);

    let forecast = registry
        .predict(LinearTrendPredictor::NAME, &data, cutoff, 2.0, 5)
        .unwrap();

    assert_eq!(forecast.len(), 5);
    assert!(forecast.values().iter().all(|&v| v == 460.0));
    assert!(forecast.timestamps().iter().all(|&t| t > cutoff));
}

#[test]
fn test_fallback_on_empty_series_is_an_error() {
    let registry = ModelRegistry::with_defaults(&ForecastConfig::default()).unwrap();
    let empty = TimeSeriesData::new("co2", Vec::new());

    let result = registry.predict(ConstantPredictor::NAME, &empty, t0(), 1.0, 2);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_invalid_request_reaches_caller() {
    let mut registry = ModelRegistry::new();
    registry
        .register_instance("Broken", Arc::new(BrokenPredictor))
        .unwrap();

    let result = registry.predict("Broken", &series(), t0(), -1.0, 4);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_instantiation_is_idempotent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = counting_registry(calls.clone());
    assert!(!registry.is_instantiated("Counted"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let data = series();
    registry.predict("Counted", &data, t0(), 1.0, 2).unwrap();
    registry.predict("Counted", &data, t0(), 1.0, 2).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(registry.is_instantiated("Counted"));
    assert!(Arc::ptr_eq(
        &registry.instance("Counted").unwrap(),
        &registry.instance("Counted").unwrap()
    ));
}

#[test]
fn test_concurrent_first_requests_build_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = Arc::new(counting_registry(calls.clone()));
    let data = Arc::new(series());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let data = Arc::clone(&data);
            thread::spawn(move || registry.predict("Counted", &data, t0(), 1.0, 3).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().len(), 3);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_model() {
    let registry = ModelRegistry::with_defaults(&ForecastConfig::default()).unwrap();
    assert!(!registry.list_names().contains(&"ARIMA"));

    let result = registry.predict("ARIMA", &series(), t0(), 1.0, 2);
    assert!(matches!(result, Err(ForecastError::UnknownModel(name)) if name == "ARIMA"));
    assert!(matches!(
        registry.instance("ARIMA"),
        Err(ForecastError::UnknownModel(_))
    ));
}

#[test]
fn test_names_keep_registration_order() {
    let mut registry = ModelRegistry::new();
    registry
        .register_instance("Zeta", Arc::new(ConstantPredictor::new()))
        .unwrap();
    registry
        .register_instance("Alpha", Arc::new(LinearTrendPredictor::new()))
        .unwrap();
    registry
        .register_instance("Broken", Arc::new(BrokenPredictor))
        .unwrap();

    assert_eq!(registry.list_names(), vec!["Zeta", "Alpha", "Broken"]);
}

#[test]
fn test_missing_artifact_surfaces_on_construction() {
    let mut config = ForecastConfig::default();
    config.forecast.artifact_path = PathBuf::from("/nonexistent/ensemble.json");
    let registry = ModelRegistry::with_defaults(&config).unwrap();
    assert_eq!(
        registry.list_names(),
        vec!["Constant Value", "Linear Trend", "XGBoost Multi-Output Predictor"]
    );

    let result = registry.predict("XGBoost Multi-Output Predictor", &series(), t0(), 1.0, 2);
    assert!(matches!(result, Err(ForecastError::ArtifactLoad { .. })));
    assert!(!registry.is_instantiated("XGBoost Multi-Output Predictor"));
}
