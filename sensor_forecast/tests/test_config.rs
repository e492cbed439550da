use pretty_assertions::assert_eq;
use sensor_forecast::error::ForecastError;
use sensor_forecast::{Channel, ForecastConfig, ModelRegistry, ParameterCatalog};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_match_dashboard_settings() {
    let config = ForecastConfig::default();
    assert_eq!(config.forecast.default_horizon_hours, 6.0);
    assert_eq!(config.forecast.num_points, 20);
    assert_eq!(
        config.forecast.artifact_path,
        PathBuf::from("models/trained/multi_output_ensemble.json")
    );
    assert_eq!(config.logging.level, "info");

    let co2 = config.catalog.info("co2").unwrap();
    assert_eq!(co2.unit, "ppm");
    assert_eq!(co2.source_column.as_deref(), Some("SCD30_CO2"));
    assert_eq!(config.catalog.len(), 11);
}

#[test]
fn test_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forecast.json");
    fs::write(
        &path,
        r##"{
            "catalog": {
                "temperature": {
                    "unit": "°C",
                    "display_name": "Temperatur",
                    "color": "#4ECDC4",
                    "channel": "temperature",
                    "source_column": "SCD30_Temperature"
                },
                "radon": {
                    "unit": "Bq/m³",
                    "display_name": "Radon",
                    "color": "#000000"
                }
            },
            "forecast": { "default_horizon_hours": 3, "artifact_path": "ensemble.json" },
            "logging": { "level": "debug", "filter": "polars=warn" }
        }"##,
    )
    .unwrap();

    let config = ForecastConfig::from_file(&path).unwrap();
    assert_eq!(config.catalog.keys().collect::<Vec<_>>(), vec!["radon", "temperature"]);
    assert_eq!(config.catalog.channel_for("temperature").unwrap(), Channel::Temperature);
    assert!(matches!(
        config.catalog.channel_for("radon"),
        Err(ForecastError::UnsupportedParameter(_))
    ));
    assert_eq!(config.forecast.default_horizon_hours, 3.0);
    assert_eq!(config.forecast.num_points, 20);
    assert_eq!(config.logging.filter.as_deref(), Some("polars=warn"));

    // The registry is built from the same config without touching the artifact
    let registry = ModelRegistry::with_defaults(&config).unwrap();
    assert_eq!(registry.list_names().len(), 3);
}

#[test]
fn test_invalid_files() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        ForecastConfig::from_file(dir.path().join("absent.json")),
        Err(ForecastError::IoError(_))
    ));

    let malformed = dir.path().join("malformed.json");
    fs::write(&malformed, "{\"forecast\": ").unwrap();
    assert!(matches!(
        ForecastConfig::from_file(&malformed),
        Err(ForecastError::Json(_))
    ));

    let negative = dir.path().join("negative.json");
    fs::write(&negative, r#"{"forecast": {"default_horizon_hours": -1}}"#).unwrap();
    assert!(matches!(
        ForecastConfig::from_file(&negative),
        Err(ForecastError::InvalidParameter(_))
    ));

    let empty_catalog = dir.path().join("empty.json");
    fs::write(&empty_catalog, r#"{"catalog": {}}"#).unwrap();
    assert!(matches!(
        ForecastConfig::from_file(&empty_catalog),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_catalog_round_trips_through_json() {
    let catalog = ParameterCatalog::default();
    let text = serde_json::to_string(&catalog).unwrap();
    let parsed: ParameterCatalog = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, catalog);
}
