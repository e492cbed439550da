use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use sensor_forecast::error::ForecastError;
use sensor_forecast::{DataLoader, MockProvider, ParameterCatalog};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 24)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn write_export(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const EXPORT: &str = "\
time,SCD30_CO2,SCD30_Temperature,BME680_Pressure,Unrelated
2024-09-24 10:10:00+02:00,430,21.5,1012.0,x
2024-09-24 10:00:00+02:00,420,,1012.5,y
2024-09-24 10:05:00+02:00,,21.0,,z
not a time,999,99,9,w
2024-09-24 10:15:00+02:00,440,22.0,1011.5,v
";

#[test]
fn test_load_export() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, "Multisensor_104_combined.csv", EXPORT);

    let room = DataLoader::from_csv(&path, &ParameterCatalog::default()).unwrap();
    assert_eq!(room.room(), "Sensor 104");
    assert_eq!(room.parameters(), vec!["co2", "pressure", "temperature"]);

    let co2 = room.series("co2").unwrap();
    let timestamps: Vec<NaiveDateTime> = co2.observations().iter().map(|o| o.timestamp).collect();
    assert_eq!(timestamps, vec![at(10, 0), at(10, 5), at(10, 10), at(10, 15)]);
    // Gaps are forward filled
    assert_eq!(co2.values(), vec![420.0, 420.0, 430.0, 440.0]);
    assert_eq!(co2.observations()[0].unit, "ppm");

    // Leading gaps are dropped rather than invented
    let temperature = room.series("temperature").unwrap();
    assert_eq!(temperature.values(), vec![21.0, 21.5, 22.0]);

    assert_eq!(co2.companions().len(), 2);
    assert_eq!(co2.readings_for("pressure").unwrap().len(), 4);
}

#[test]
fn test_missing_parameter_and_time_column() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, "Multisensor_104_combined.csv", EXPORT);
    let room = DataLoader::from_csv(&path, &ParameterCatalog::default()).unwrap();
    assert!(matches!(
        room.series("humidity"),
        Err(ForecastError::InsufficientData(_))
    ));

    let no_time = write_export(&dir, "broken.csv", "stamp,SCD30_CO2\n2024-09-24 10:00:00,400\n");
    assert!(matches!(
        DataLoader::from_csv(&no_time, &ParameterCatalog::default()),
        Err(ForecastError::DataError(_))
    ));

    assert!(DataLoader::from_csv(dir.path().join("absent.csv"), &ParameterCatalog::default()).is_err());
}

#[test]
fn test_mock_room_covers_catalog() {
    let catalog = ParameterCatalog::default();
    let mut provider = MockProvider::seeded(catalog.clone(), 3).unwrap();
    let room = provider.room_data("Mock Room", at(0, 0), at(6, 0)).unwrap();

    assert_eq!(room.parameters().len(), catalog.len());
    let pressure = room.series("pressure").unwrap();
    assert_eq!(pressure.len(), 73);
    assert_eq!(pressure.companions().len(), catalog.len() - 1);

    let mean = pressure.values().iter().sum::<f64>() / pressure.len() as f64;
    assert!((mean - 1013.0).abs() < 100.0);
}
