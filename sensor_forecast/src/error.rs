//! Error types for the sensor_forecast crate

use forecast_math::MathError;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the sensor_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The training prefix is too small for the chosen algorithm
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The requested parameter has no mapping in the catalog
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// The registry has no model under this name
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// The learned model artifact could not be loaded
    #[error("Failed to load model artifact from {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// The artifact rejected its input or produced malformed output
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    Csv(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Csv(err.to_string())
    }
}
