//! Time series data handling for forecasting
//!
//! A [`TimeSeriesData`] holds the readings of one sensor parameter, ordered by
//! timestamp, plus optional companion readings of the other parameters
//! recorded in the same room. A cutoff instant partitions it into a training
//! prefix (`timestamp <= cutoff`) and a validation suffix (`timestamp > cutoff`).

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// A single timezone-naive sensor reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Instant the reading was taken
    pub timestamp: NaiveDateTime,
    /// Measured value
    pub value: f64,
    /// Display unit of the value
    pub unit: String,
}

impl Observation {
    /// Create a new observation
    pub fn new(timestamp: NaiveDateTime, value: f64, unit: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            unit: unit.into(),
        }
    }
}

/// Readings of one parameter, with companion readings of related parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesData {
    /// Parameter key of the primary readings (e.g. `temperature`)
    parameter: String,
    /// Primary readings, ascending by timestamp
    observations: Vec<Observation>,
    /// Other parameters of the same room, keyed by parameter key
    companions: BTreeMap<String, Vec<Observation>>,
}

/// Training/validation partition of a series at a cutoff
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSplit<'a> {
    /// Observations with `timestamp <= cutoff`
    pub training: Vec<&'a Observation>,
    /// Observations with `timestamp > cutoff`
    pub validation: Vec<&'a Observation>,
}

impl<'a> WindowSplit<'a> {
    /// Latest training observation by timestamp
    pub fn last_training(&self) -> Option<&'a Observation> {
        self.training.iter().copied().max_by_key(|o| o.timestamp)
    }

    /// Training values in series order
    pub fn training_values(&self) -> Vec<f64> {
        self.training.iter().map(|o| o.value).collect()
    }
}

/// Counts and basic statistics of a training/validation split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub training_points: usize,
    pub validation_points: usize,
    pub training_mean: Option<f64>,
    pub training_std_dev: Option<f64>,
}

impl TimeSeriesData {
    /// Create a series for `parameter` from ordered observations
    pub fn new(parameter: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            parameter: parameter.into(),
            observations,
            companions: BTreeMap::new(),
        }
    }

    /// Create a series from parallel timestamps and values sharing one unit
    pub fn from_values(
        parameter: impl Into<String>,
        unit: &str,
        timestamps: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }

        let observations = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| Observation::new(timestamp, value, unit))
            .collect();

        Ok(Self::new(parameter, observations))
    }

    /// Attach readings of another parameter recorded alongside this one
    pub fn with_companion(
        mut self,
        parameter: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Self {
        self.companions.insert(parameter.into(), observations);
        self
    }

    /// Parameter key of the primary readings
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Primary readings
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Companion readings keyed by parameter
    pub fn companions(&self) -> &BTreeMap<String, Vec<Observation>> {
        &self.companions
    }

    /// Readings for `parameter`, whether primary or companion
    pub fn readings_for(&self, parameter: &str) -> Option<&[Observation]> {
        if parameter == self.parameter {
            Some(&self.observations)
        } else {
            self.companions.get(parameter).map(Vec::as_slice)
        }
    }

    /// Number of primary observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether there are no primary observations
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Primary values in series order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Timestamp of the first primary observation
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.first().map(|o| o.timestamp)
    }

    /// Timestamp of the last primary observation
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.observations.last().map(|o| o.timestamp)
    }

    /// Partition the primary readings at `cutoff`
    pub fn split_at(&self, cutoff: NaiveDateTime) -> WindowSplit<'_> {
        let (training, validation): (Vec<&Observation>, Vec<&Observation>) = self
            .observations
            .iter()
            .partition(|o| o.timestamp <= cutoff);

        WindowSplit {
            training,
            validation,
        }
    }

    /// Cutoff at a fractional position through the series, as set by the
    /// dashboard slider: the timestamp at index `floor(len * position)`.
    pub fn cutoff_at_position(&self, position: f64) -> Result<NaiveDateTime> {
        if !position.is_finite() || !(0.0..=1.0).contains(&position) {
            return Err(ForecastError::InvalidParameter(format!(
                "Cutoff position must be within [0, 1], got {}",
                position
            )));
        }
        if self.observations.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Cannot place a cutoff in an empty series".to_string(),
            ));
        }

        let index = ((self.observations.len() as f64 * position).floor() as usize)
            .min(self.observations.len() - 1);
        Ok(self.observations[index].timestamp)
    }

    /// Keep only the last `hours` of readings, measured back from the last
    /// primary observation. Companions are cut at the same instant.
    pub fn lookback(&self, hours: f64) -> Result<Self> {
        let last = self.last_timestamp().ok_or_else(|| {
            ForecastError::InsufficientData("Cannot window an empty series".to_string())
        })?;
        let start = last
            .checked_sub_signed(duration_from_hours(hours)?)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Lookback of {} hours before {} is out of the timestamp range",
                    hours, last
                ))
            })?;

        let keep = |observations: &[Observation]| -> Vec<Observation> {
            observations
                .iter()
                .filter(|o| o.timestamp >= start)
                .cloned()
                .collect()
        };

        Ok(Self {
            parameter: self.parameter.clone(),
            observations: keep(&self.observations),
            companions: self
                .companions
                .iter()
                .map(|(key, readings)| (key.clone(), keep(readings)))
                .collect(),
        })
    }

    /// Training/validation counts and training statistics at `cutoff`
    pub fn summary(&self, cutoff: NaiveDateTime) -> WindowSummary {
        let split = self.split_at(cutoff);
        let values = split.training_values();

        let finite = |v: f64| if v.is_finite() { Some(v) } else { None };
        let (training_mean, training_std_dev) = if values.is_empty() {
            (None, None)
        } else {
            (finite(values.iter().mean()), finite(values.iter().std_dev()))
        };

        WindowSummary {
            training_points: split.training.len(),
            validation_points: split.validation.len(),
            training_mean,
            training_std_dev,
        }
    }
}

/// Convert a positive number of hours to a duration at microsecond resolution
pub(crate) fn duration_from_hours(hours: f64) -> Result<Duration> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "Hours must be a positive finite number, got {}",
            hours
        )));
    }

    let micros = (hours * 3_600_000_000.0).round();
    if micros >= i64::MAX as f64 {
        return Err(ForecastError::InvalidParameter(format!(
            "{} hours is too long to represent",
            hours
        )));
    }

    Ok(Duration::microseconds(micros as i64))
}
