//! Named model registry with lazy instantiation and safe fallback
//!
//! Models are registered by display name together with a factory. The first
//! request for a name builds the model; later requests reuse it. Every
//! prediction routed through the registry goes through [`predict_or_fallback`],
//! so a failing model degrades to a flat carry-forward line instead of an error.

use crate::config::ForecastConfig;
use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::models::constant::fallback_forecast;
use crate::models::{
    ConstantPredictor, Forecast, LearnedPredictor, LinearTrendPredictor, Predictor,
};
use chrono::NaiveDateTime;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a model on first use
pub type PredictorFactory = Box<dyn Fn() -> Result<Arc<dyn Predictor>> + Send + Sync>;

struct RegistryEntry {
    name: String,
    factory: Option<PredictorFactory>,
    instance: OnceCell<Arc<dyn Predictor>>,
}

/// Registered models, in registration order
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.list_names())
            .finish()
    }
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the constant, linear-trend and learned models.
    ///
    /// The learned model loads its artifact from the configured path on first
    /// use, so a missing artifact only surfaces when that model is requested.
    pub fn with_defaults(config: &ForecastConfig) -> Result<Self> {
        let mut registry = Self::new();

        registry.register(ConstantPredictor::NAME, || {
            Ok(Arc::new(ConstantPredictor::new()) as Arc<dyn Predictor>)
        })?;
        registry.register(LinearTrendPredictor::NAME, || {
            Ok(Arc::new(LinearTrendPredictor::new()) as Arc<dyn Predictor>)
        })?;

        let artifact_path = config.forecast.artifact_path.clone();
        let catalog = config.catalog.clone();
        registry.register(LearnedPredictor::NAME, move || {
            let model = LearnedPredictor::load(&artifact_path, &catalog)?;
            Ok(Arc::new(model) as Arc<dyn Predictor>)
        })?;

        Ok(registry)
    }

    /// Register a model factory under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> Result<Arc<dyn Predictor>> + Send + Sync + 'static,
    {
        self.insert(name.into(), Some(Box::new(factory)), OnceCell::new())
    }

    /// Register an already built model under `name`
    pub fn register_instance(
        &mut self,
        name: impl Into<String>,
        predictor: Arc<dyn Predictor>,
    ) -> Result<()> {
        self.insert(name.into(), None, OnceCell::with_value(predictor))
    }

    fn insert(
        &mut self,
        name: String,
        factory: Option<PredictorFactory>,
        instance: OnceCell<Arc<dyn Predictor>>,
    ) -> Result<()> {
        if self.index.contains_key(&name) {
            return Err(ForecastError::InvalidParameter(format!(
                "Model {} is already registered",
                name
            )));
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(RegistryEntry {
            name,
            factory,
            instance,
        });
        Ok(())
    }

    /// Registered names, in registration order
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Whether `name` has been built already
    pub fn is_instantiated(&self, name: &str) -> bool {
        self.entry(name)
            .map(|e| e.instance.get().is_some())
            .unwrap_or(false)
    }

    /// The model registered under `name`, building it on first request.
    ///
    /// Concurrent first requests build the model once. A failed build is not
    /// cached, so the next request tries again.
    pub fn instance(&self, name: &str) -> Result<Arc<dyn Predictor>> {
        let entry = self.entry(name)?;
        entry
            .instance
            .get_or_try_init(|| {
                let factory = entry.factory.as_ref().ok_or_else(|| {
                    ForecastError::UnknownModel(format!("{} has no factory", entry.name))
                })?;
                let predictor = factory()?;
                tracing::debug!(model = %entry.name, "Instantiated forecasting model");
                Ok(predictor)
            })
            .cloned()
    }

    /// Forecast with the model registered under `name`.
    ///
    /// Model failures are replaced by a carry-forward forecast; only unknown
    /// names, failed construction and invalid requests reach the caller.
    pub fn predict(
        &self,
        name: &str,
        series: &TimeSeriesData,
        cutoff: NaiveDateTime,
        horizon_hours: f64,
        num_points: usize,
    ) -> Result<Forecast> {
        let predictor = self.instance(name)?;
        predict_or_fallback(predictor.as_ref(), series, cutoff, horizon_hours, num_points)
    }

    fn entry(&self, name: &str) -> Result<&RegistryEntry> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| ForecastError::UnknownModel(name.to_string()))
    }
}

/// Run `predictor`, substituting a carry-forward forecast on any failure
pub fn predict_or_fallback(
    predictor: &dyn Predictor,
    series: &TimeSeriesData,
    cutoff: NaiveDateTime,
    horizon_hours: f64,
    num_points: usize,
) -> Result<Forecast> {
    match predictor.predict(series, cutoff, horizon_hours, num_points) {
        Ok(forecast) => Ok(forecast),
        Err(err) => {
            tracing::warn!(
                model = %predictor.name(),
                parameter = %series.parameter(),
                error = %err,
                "Model failed, falling back to last value"
            );
            fallback_forecast(series, cutoff, horizon_hours, num_points)
        }
    }
}
