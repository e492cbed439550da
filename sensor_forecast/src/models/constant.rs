//! Constant-value carry-forward model

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::models::{forecast_timestamps, validate_request, Forecast, Predictor};
use chrono::NaiveDateTime;

/// Predicts the last known value for every future point
#[derive(Debug, Clone)]
pub struct ConstantPredictor {
    /// Name of the model
    name: String,
}

impl ConstantPredictor {
    /// Registry name of the model
    pub const NAME: &'static str = "Constant Value";

    /// Create a new constant-value model
    pub fn new() -> Self {
        Self {
            name: Self::NAME.to_string(),
        }
    }
}

impl Default for ConstantPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for ConstantPredictor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(
        &self,
        series: &TimeSeriesData,
        cutoff: NaiveDateTime,
        horizon_hours: f64,
        num_points: usize,
    ) -> Result<Forecast> {
        validate_request(horizon_hours, num_points)?;

        let split = series.split_at(cutoff);
        let last = split.last_training().ok_or_else(|| {
            ForecastError::InsufficientData(format!(
                "No {} readings at or before {}",
                series.parameter(),
                cutoff
            ))
        })?;

        flat_forecast(last.value, cutoff, horizon_hours, num_points)
    }
}

/// Degraded forecast used when a model fails.
///
/// Carries the last training value forward; with an empty training prefix
/// it carries the last reading of the whole series instead.
pub fn fallback_forecast(
    series: &TimeSeriesData,
    cutoff: NaiveDateTime,
    horizon_hours: f64,
    num_points: usize,
) -> Result<Forecast> {
    validate_request(horizon_hours, num_points)?;

    let split = series.split_at(cutoff);
    let last = split
        .last_training()
        .or_else(|| series.observations().last())
        .ok_or_else(|| {
            ForecastError::InsufficientData(format!(
                "No {} readings to fall back on",
                series.parameter()
            ))
        })?;

    flat_forecast(last.value, cutoff, horizon_hours, num_points)
}

fn flat_forecast(
    value: f64,
    cutoff: NaiveDateTime,
    horizon_hours: f64,
    num_points: usize,
) -> Result<Forecast> {
    let timestamps = forecast_timestamps(cutoff, horizon_hours, num_points)?;
    Forecast::new(timestamps, vec![value; num_points])
}
