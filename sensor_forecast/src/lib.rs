//! # Sensor Forecast
//!
//! Short-horizon forecasting for environmental sensor readings (CO2,
//! temperature, humidity, pressure, illuminance and air-quality indices).
//!
//! ## Features
//!
//! - Time series windowing: split a series at a cutoff into a training prefix
//!   and a validation suffix
//! - Interchangeable models behind the [`Predictor`] trait: constant value,
//!   damped linear trend and a learned multi-output tree ensemble
//! - A [`ModelRegistry`] that builds models lazily by name and falls back to a
//!   carry-forward line when a model fails
//! - CSV and synthetic data sources, a JSON parameter catalog and accuracy
//!   metrics against the validation suffix
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensor_forecast::{DataLoader, ForecastConfig, ModelRegistry};
//!
//! let config = ForecastConfig::default();
//! let room = DataLoader::from_csv("Multisensor_104_combined.csv", &config.catalog)?;
//! let series = room.series("co2")?;
//!
//! let cutoff = series.cutoff_at_position(0.8)?;
//! let registry = ModelRegistry::with_defaults(&config)?;
//! let forecast = registry.predict("Linear Trend", &series, cutoff, 6.0, 20)?;
//! println!("{:?}", forecast.values());
//! # Ok::<(), sensor_forecast::ForecastError>(())
//! ```

pub mod channel;
pub mod config;
pub mod data;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod mock;
pub mod models;
pub mod registry;
pub mod telemetry;

// Re-export commonly used types
pub use crate::channel::Channel;
pub use crate::config::{ForecastConfig, ParameterCatalog, ParameterInfo};
pub use crate::data::{Observation, TimeSeriesData, WindowSplit, WindowSummary};
pub use crate::error::{ForecastError, Result};
pub use crate::loader::{DataLoader, RoomData};
pub use crate::metrics::{evaluate_forecast, ForecastAccuracy};
pub use crate::mock::MockProvider;
pub use crate::models::{Forecast, Predictor, DEFAULT_NUM_POINTS};
pub use crate::registry::ModelRegistry;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
