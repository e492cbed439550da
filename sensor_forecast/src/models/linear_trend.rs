//! Damped linear-trend extrapolation

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::models::{forecast_timestamps, hour_offsets, validate_request, Forecast, Predictor};
use chrono::NaiveDateTime;
use forecast_math::RollingTrend;

/// Number of recent training points the trend is fitted on
pub const DEFAULT_TREND_WINDOW: usize = 10;

/// Fraction of the fitted slope applied when extrapolating
pub const DEFAULT_DAMPING: f64 = 0.5;

/// Extrapolates a least-squares trend of the most recent readings.
///
/// The value at an offset of `h` hours is `last + damping * slope * h`,
/// where `slope` is fitted against position index over the last `window`
/// training readings.
#[derive(Debug, Clone)]
pub struct LinearTrendPredictor {
    /// Name of the model
    name: String,
    /// Number of trailing points in the fit
    window: usize,
    /// Slope damping factor
    damping: f64,
}

impl LinearTrendPredictor {
    /// Registry name of the model
    pub const NAME: &'static str = "Linear Trend";

    /// Create a linear-trend model with the default window and damping
    pub fn new() -> Self {
        Self {
            name: Self::NAME.to_string(),
            window: DEFAULT_TREND_WINDOW,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Create a linear-trend model with a custom window and damping
    pub fn with_parameters(window: usize, damping: f64) -> Result<Self> {
        if window < 2 {
            return Err(ForecastError::InvalidParameter(
                "Trend window must cover at least 2 points".to_string(),
            ));
        }
        if !damping.is_finite() || damping < 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Damping must be a non-negative number, got {}",
                damping
            )));
        }

        Ok(Self {
            name: Self::NAME.to_string(),
            window,
            damping,
        })
    }

    /// Number of trailing points in the fit
    pub fn window(&self) -> usize {
        self.window
    }

    /// Slope damping factor
    pub fn damping(&self) -> f64 {
        self.damping
    }
}

impl Default for LinearTrendPredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor for LinearTrendPredictor {
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
        if split.training.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least 2 data points for trend analysis, got {}",
                split.training.len()
            )));
        }

        let history = split.training_values();
        let fit = RollingTrend::from_tail(self.window, &history)?.fit()?;
        let last_value = history[history.len() - 1];

        let timestamps = forecast_timestamps(cutoff, horizon_hours, num_points)?;
        let values = hour_offsets(horizon_hours, num_points)
            .into_iter()
            .map(|hours| last_value + fit.slope * hours * self.damping)
            .collect();

        Forecast::new(timestamps, values)
    }
}
