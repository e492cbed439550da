//! Least-squares trend fitting for short sensor windows
//!
//! Fits a first-degree line of value against position index, the same
//! parameterisation a polynomial fit of degree one over `0..n` produces.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// A fitted line `value = slope * index + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Change in value per index step
    pub slope: f64,
    /// Fitted value at index zero
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a least-squares line to `values` indexed `0..values.len()`
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Need at least 2 points for a linear fit, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Linear fit input contains non-finite values".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (0..values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }
}

/// Rolling least-squares fit over the most recent `period` values
#[derive(Debug, Clone)]
pub struct RollingTrend {
    period: usize,
    values: VecDeque<f64>,
}

impl RollingTrend {
    /// Create a rolling trend keeping at most `period` values
    pub fn new(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Period must be at least 2 for linear regression".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Push a value, evicting the oldest one once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Build a window from the tail of `values`
    pub fn from_tail(period: usize, values: &[f64]) -> Result<Self> {
        let mut trend = Self::new(period)?;
        let start = values.len().saturating_sub(period);
        for &value in &values[start..] {
            trend.update(value);
        }
        Ok(trend)
    }

    /// Fit the current window
    pub fn fit(&self) -> Result<LinearFit> {
        let window: Vec<f64> = self.values.iter().copied().collect();
        LinearFit::fit(&window)
    }

    /// Number of values currently held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window holds no values yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of values held
    pub fn period(&self) -> usize {
        self.period
    }
}
