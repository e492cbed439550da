//! # Sensor Dashboard
//!
//! Workspace facade over the forecasting crates of the sensor dashboard.
//!
//! - [`forecast`]: series windowing, models, registry, data sources
//! - [`math`]: trend fitting, interpolation and cyclical encodings
//!
//! ## Example
//!
//! ```
//! use sensor_dashboard_workspace::forecast::{ForecastConfig, ModelRegistry};
//!
//! let registry = ModelRegistry::with_defaults(&ForecastConfig::default()).unwrap();
//! assert_eq!(registry.list_names()[0], "Constant Value");
//! ```

pub use forecast_math as math;
pub use sensor_forecast as forecast;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facade_reaches_both_crates() {
        let fit = math::LinearFit::fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert_eq!(forecast::DEFAULT_NUM_POINTS, 20);
    }
}
