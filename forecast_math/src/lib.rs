//! # Forecast Math
//!
//! Numeric building blocks for the sensor forecasting models.
//! This crate provides least-squares trend fitting, time-weighted gap
//! interpolation and cyclical encodings of calendar fields.

use thiserror::Error;

pub mod cyclical;
pub mod interpolation;
pub mod regression;

pub use crate::regression::{LinearFit, RollingTrend};

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
