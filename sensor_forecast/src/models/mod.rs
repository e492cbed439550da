//! Forecasting models for sensor series
//!
//! Every model implements [`Predictor`]: given a series, a cutoff, a horizon
//! in hours and a point count, it returns a [`Forecast`] of equally many
//! future timestamps and values.

use crate::data::{duration_from_hours, TimeSeriesData};
use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Debug;

pub mod constant;
pub mod learned;
pub mod linear_trend;

pub use constant::ConstantPredictor;
pub use learned::LearnedPredictor;
pub use linear_trend::LinearTrendPredictor;

/// Number of forecast points when the caller doesn't choose one
pub const DEFAULT_NUM_POINTS: usize = 20;

/// Longest accepted forecast horizon, in hours
pub const MAX_HORIZON_HOURS: f64 = 24.0 * 366.0 * 10.0;

/// Forecast trajectory: parallel timestamps and predicted values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl Forecast {
    /// Create a forecast, checking lengths match and timestamps strictly increase
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::DataError(
                "Forecast timestamps must be strictly increasing".to_string(),
            ));
        }

        Ok(Self { timestamps, values })
    }

    /// Forecast timestamps
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Forecast values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of forecast points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the forecast has no points
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(timestamp, value)` pairs
    pub fn points(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}

/// Common interface for forecasting models
pub trait Predictor: Debug + Send + Sync {
    /// Stable display name of the model
    fn name(&self) -> &str;

    /// Forecast `num_points` values over `horizon_hours` after `cutoff`,
    /// training only on observations at or before `cutoff`.
    fn predict(
        &self,
        series: &TimeSeriesData,
        cutoff: NaiveDateTime,
        horizon_hours: f64,
        num_points: usize,
    ) -> Result<Forecast>;
}

/// Check the horizon and point count of a prediction request
pub fn validate_request(horizon_hours: f64, num_points: usize) -> Result<()> {
    if !horizon_hours.is_finite() || horizon_hours <= 0.0 || horizon_hours > MAX_HORIZON_HOURS {
        return Err(ForecastError::InvalidParameter(format!(
            "Horizon must be a positive number of hours up to {}, got {}",
            MAX_HORIZON_HOURS, horizon_hours
        )));
    }
    if num_points == 0 {
        return Err(ForecastError::InvalidParameter(
            "Number of forecast points must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Hour offsets `i * horizon_hours / num_points` for `i` in `1..=num_points`
pub fn hour_offsets(horizon_hours: f64, num_points: usize) -> Vec<f64> {
    (1..=num_points)
        .map(|i| i as f64 * (horizon_hours / num_points as f64))
        .collect()
}

/// Evenly spaced forecast timestamps strictly after `cutoff`.
///
/// Point `i` (1-based) sits at `cutoff + i * horizon_hours / num_points`
/// hours; the cutoff itself is never included.
pub fn forecast_timestamps(
    cutoff: NaiveDateTime,
    horizon_hours: f64,
    num_points: usize,
) -> Result<Vec<NaiveDateTime>> {
    validate_request(horizon_hours, num_points)?;

    let step = horizon_hours / num_points as f64;
    if step * 3_600_000_000.0 < 1.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "Forecast step of {} hours is below timestamp resolution",
            step
        )));
    }

    hour_offsets(horizon_hours, num_points)
        .into_iter()
        .map(|hours| {
            let offset = duration_from_hours(hours)?;
            cutoff.checked_add_signed(offset).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Forecast timestamp {} hours after {} is out of range",
                    hours, cutoff
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn cutoff() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_grid_excludes_cutoff() {
        let timestamps = forecast_timestamps(cutoff(), 2.0, 4).unwrap();
        assert_eq!(timestamps.len(), 4);
        assert_eq!(timestamps[0], cutoff() + Duration::minutes(30));
        assert_eq!(timestamps[3], cutoff() + Duration::hours(2));
    }

    #[test]
    fn test_request_validation() {
        assert!(forecast_timestamps(cutoff(), 0.0, 4).is_err());
        assert!(forecast_timestamps(cutoff(), -1.0, 4).is_err());
        assert!(forecast_timestamps(cutoff(), f64::NAN, 4).is_err());
        assert!(forecast_timestamps(cutoff(), 1.0, 0).is_err());
    }

    #[test]
    fn test_forecast_rejects_mismatch() {
        assert!(Forecast::new(vec![cutoff()], vec![]).is_err());
        assert!(Forecast::new(vec![cutoff(), cutoff()], vec![1.0, 2.0]).is_err());
    }
}
