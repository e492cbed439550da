//! Metrics for evaluating forecast performance

use crate::data::Observation;
use crate::error::{ForecastError, Result};
use crate::models::Forecast;
use chrono::NaiveDateTime;
use forecast_math::interpolation::value_at;
use serde::Serialize;

/// Compare a forecast against the validation readings that follow the cutoff.
///
/// The actual value at each forecast timestamp is interpolated in time from
/// the validation readings; timestamps outside their span are skipped.
pub fn evaluate_forecast(forecast: &Forecast, validation: &[&Observation]) -> Result<ForecastAccuracy> {
    let Some(origin) = validation.iter().map(|o| o.timestamp).min() else {
        return Err(ForecastError::DataError(
            "No validation readings after the cutoff".to_string(),
        ));
    };
    let seconds = |timestamp: NaiveDateTime| (timestamp - origin).num_milliseconds() as f64 / 1000.0;

    let mut samples: Vec<(f64, f64)> = validation
        .iter()
        .filter(|o| o.value.is_finite())
        .map(|o| (seconds(o.timestamp), o.value))
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (predicted, actual): (Vec<f64>, Vec<f64>) = forecast
        .points()
        .filter_map(|(timestamp, value)| {
            value_at(&samples, seconds(timestamp)).map(|actual| (value, actual))
        })
        .unzip();

    if predicted.is_empty() {
        return Err(ForecastError::DataError(
            "No forecast timestamp falls within the validation readings".to_string(),
        ));
    }

    accuracy(&predicted, &actual)
}

/// Accuracy of paired forecast and actual values.
///
/// Pairs with a zero actual value are left out of MAPE only.
pub fn accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::DataError(
            "Forecast and actual values must have the same non-zero length".to_string(),
        ));
    }

    let totals = forecast
        .iter()
        .zip(actual)
        .fold(ErrorTotals::default(), |totals, (&f, &a)| totals.add(f, a));
    Ok(totals.finish())
}

/// Running sums of forecast errors
#[derive(Debug, Default)]
struct ErrorTotals {
    points: usize,
    absolute: f64,
    squared: f64,
    percentage: f64,
    percentage_points: usize,
    symmetric: f64,
}

impl ErrorTotals {
    fn add(mut self, predicted: f64, actual: f64) -> Self {
        let error = (actual - predicted).abs();
        self.points += 1;
        self.absolute += error;
        self.squared += error * error;
        if actual != 0.0 {
            self.percentage += 100.0 * error / actual.abs();
            self.percentage_points += 1;
        }
        let scale = actual.abs() + predicted.abs();
        if scale > 0.0 {
            self.symmetric += 200.0 * error / scale;
        }
        self
    }

    fn finish(self) -> ForecastAccuracy {
        let n = self.points as f64;
        let mse = self.squared / n;
        ForecastAccuracy {
            points: self.points,
            mae: self.absolute / n,
            mse,
            rmse: mse.sqrt(),
            mape: (self.percentage_points > 0)
                .then(|| self.percentage / self.percentage_points as f64),
            smape: self.symmetric / n,
        }
    }
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastAccuracy {
    /// Number of compared points
    pub points: usize,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Mean Absolute Percentage Error over pairs with a non-zero actual;
    /// `None` when every actual is zero
    pub mape: Option<f64>,
    /// Symmetric Mean Absolute Percentage Error
    pub smape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy ({} points):", self.points)?;
        writeln!(f, "  MAE:     {:.4}", self.mae)?;
        writeln!(f, "  MSE:     {:.4}", self.mse)?;
        writeln!(f, "  RMSE:    {:.4}", self.rmse)?;
        match self.mape {
            Some(mape) => writeln!(f, "  MAPE:    {:.4}%", mape)?,
            None => writeln!(f, "  MAPE:    n/a")?,
        }
        writeln!(f, "  SMAPE:   {:.4}%", self.smape)?;
        Ok(())
    }
}
