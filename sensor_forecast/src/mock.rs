//! Synthetic sensor readings for running without recorded data

use crate::config::ParameterCatalog;
use crate::data::{duration_from_hours, Observation, TimeSeriesData};
use crate::error::{ForecastError, Result};
use crate::loader::RoomData;
use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Minutes between synthetic readings
pub const MOCK_STEP_MINUTES: i64 = 5;

/// Relative amplitude of the daily cycle
const DAILY_AMPLITUDE: f64 = 0.1;

/// Standard deviation of the relative noise
const NOISE_STD_DEV: f64 = 0.05;

/// Typical level of a parameter
pub fn base_value(parameter: &str) -> f64 {
    match parameter {
        "co2" => 400.0,
        "temperature" => 22.0,
        "humidity" => 45.0,
        "pressure" => 1013.0,
        "iaq" => 50.0,
        "voc" => 100.0,
        _ => 50.0,
    }
}

/// Generates a daily sine cycle with gaussian noise around each parameter's
/// base value, one reading every 5 minutes.
#[derive(Debug)]
pub struct MockProvider {
    catalog: ParameterCatalog,
    rng: StdRng,
    noise: Normal<f64>,
}

impl MockProvider {
    /// Provider seeded from system entropy
    pub fn new(catalog: ParameterCatalog) -> Result<Self> {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Provider with reproducible output
    pub fn seeded(catalog: ParameterCatalog, seed: u64) -> Result<Self> {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: ParameterCatalog, rng: StdRng) -> Result<Self> {
        let noise = Normal::new(0.0, NOISE_STD_DEV)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        Ok(Self {
            catalog,
            rng,
            noise,
        })
    }

    /// Readings of `parameter` from `start` through `end` inclusive
    pub fn fetch(
        &mut self,
        parameter: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<TimeSeriesData> {
        let observations = self.readings(parameter, start, end)?;
        Ok(TimeSeriesData::new(parameter, observations))
    }

    /// Readings of every catalog parameter over the same span
    pub fn room_data(
        &mut self,
        room: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<RoomData> {
        let parameters: Vec<String> = self.catalog.keys().map(str::to_string).collect();
        let mut readings = BTreeMap::new();
        for parameter in parameters {
            let observations = self.readings(&parameter, start, end)?;
            readings.insert(parameter, observations);
        }

        tracing::debug!(room, %start, %end, "Generated mock room data");
        Ok(RoomData::new(room, readings))
    }

    /// Readings covering the `hours` before `end`
    pub fn recent(&mut self, room: &str, end: NaiveDateTime, hours: f64) -> Result<RoomData> {
        let start = end
            .checked_sub_signed(duration_from_hours(hours)?)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "{} hours before {} is out of the timestamp range",
                    hours, end
                ))
            })?;
        self.room_data(room, start, end)
    }

    fn readings(
        &mut self,
        parameter: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Observation>> {
        let unit = self.catalog.info(parameter)?.unit.clone();
        if end < start {
            return Err(ForecastError::InvalidParameter(format!(
                "Mock range ends ({}) before it starts ({})",
                end, start
            )));
        }

        let base = base_value(parameter);
        let step = Duration::minutes(MOCK_STEP_MINUTES);
        let mut observations = Vec::new();
        let mut current = start;
        while current <= end {
            let hours = (current - start).num_seconds() as f64 / 3600.0;
            let daily_cycle = (2.0 * PI * hours / 24.0).sin() * DAILY_AMPLITUDE;
            let noise = self.noise.sample(&mut self.rng);
            observations.push(Observation::new(
                current,
                base * (1.0 + daily_cycle + noise),
                unit.as_str(),
            ));
            match current.checked_add_signed(step) {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(observations)
    }
}
