//! Multisensor CSV exports
//!
//! An export is a wide table: a `time` column followed by one column per
//! sensor channel (`SCD30_CO2`, `BME680_Pressure`, ...). Columns are mapped to
//! parameter keys through the catalog's `source_column`.

use crate::config::ParameterCatalog;
use crate::data::{Observation, TimeSeriesData};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::Path;

const TIME_COLUMN: &str = "time";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// All parameters recorded in one room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomData {
    room: String,
    readings: BTreeMap<String, Vec<Observation>>,
}

impl RoomData {
    /// Create room data from per-parameter readings
    pub fn new(room: impl Into<String>, readings: BTreeMap<String, Vec<Observation>>) -> Self {
        Self {
            room: room.into(),
            readings,
        }
    }

    /// Room display name
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Parameters with at least one reading, sorted
    pub fn parameters(&self) -> Vec<&str> {
        self.readings
            .iter()
            .filter(|(_, readings)| !readings.is_empty())
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Series of `parameter`, carrying the room's other parameters as companions
    pub fn series(&self, parameter: &str) -> Result<TimeSeriesData> {
        let observations = self
            .readings
            .get(parameter)
            .filter(|readings| !readings.is_empty())
            .ok_or_else(|| {
                ForecastError::InsufficientData(format!(
                    "No {} readings for {}",
                    parameter, self.room
                ))
            })?;

        let series = self
            .readings
            .iter()
            .filter(|(key, readings)| key.as_str() != parameter && !readings.is_empty())
            .fold(
                TimeSeriesData::new(parameter, observations.clone()),
                |series, (key, readings)| series.with_companion(key.clone(), readings.clone()),
            );
        Ok(series)
    }
}

/// Reads multisensor CSV exports into [`RoomData`]
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV export, naming the room after the file
    pub fn from_csv<P: AsRef<Path>>(path: P, catalog: &ParameterCatalog) -> Result<RoomData> {
        let path = path.as_ref();
        let room = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(room_name)
            .ok_or_else(|| {
                ForecastError::DataError(format!("Invalid data file path {}", path.display()))
            })?;

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();

        let time_index = headers
            .iter()
            .position(|h| h.trim() == TIME_COLUMN)
            .ok_or_else(|| {
                ForecastError::DataError(format!("No {} column in {}", TIME_COLUMN, path.display()))
            })?;

        // (parameter, unit, column index)
        let mapped: Vec<(String, String, usize)> = catalog
            .iter()
            .filter_map(|(key, info)| {
                let column = info.source_column.as_deref()?;
                let index = headers.iter().position(|h| h.trim() == column)?;
                Some((key.to_string(), info.unit.clone(), index))
            })
            .collect();

        let mut rows: Vec<(NaiveDateTime, Vec<Option<f64>>)> = Vec::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            let Some(timestamp) = record.get(time_index).and_then(parse_timestamp) else {
                skipped += 1;
                continue;
            };
            let values = mapped
                .iter()
                .map(|(_, _, index)| {
                    record
                        .get(*index)
                        .and_then(|cell| cell.trim().parse::<f64>().ok())
                        .filter(|v| v.is_finite())
                })
                .collect();
            rows.push((timestamp, values));
        }
        rows.sort_by_key(|(timestamp, _)| *timestamp);

        let mut readings = BTreeMap::new();
        for (column, (parameter, unit, _)) in mapped.iter().enumerate() {
            let mut last = None;
            let mut observations = Vec::with_capacity(rows.len());
            for (timestamp, values) in &rows {
                // Forward fill; leading gaps stay empty
                if let Some(value) = values[column] {
                    last = Some(value);
                }
                if let Some(value) = last {
                    observations.push(Observation::new(*timestamp, value, unit.as_str()));
                }
            }
            readings.insert(parameter.clone(), observations);
        }

        tracing::debug!(
            path = %path.display(),
            room = %room,
            rows = rows.len(),
            skipped,
            parameters = readings.len(),
            "Loaded sensor CSV"
        );

        Ok(RoomData::new(room, readings))
    }
}

/// Room display name from an export file name
/// (`Multisensor_104_combined.csv` becomes `Sensor 104`).
pub fn room_name(file_name: &str) -> String {
    let base = file_name
        .replace("_combined.csv", "")
        .replace(".csv", "");

    if let Some(id) = base.split("Multisensor_").nth(1) {
        return format!("Sensor {}", id);
    }

    base.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parse an export timestamp; offsets are dropped keeping the wall time
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(with_offset.naive_local());
    }
    if let Ok(with_offset) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(with_offset.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
