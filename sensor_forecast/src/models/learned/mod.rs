//! Learned multi-output model backed by a pre-trained artifact
//!
//! The artifact was trained on every tracked channel at a 5-minute cadence
//! with cyclical calendar features. At inference the model carries the last
//! known sensor state forward onto the future grid, asks the artifact for all
//! channels at once and keeps the one matching the requested parameter.

use crate::channel::Channel;
use crate::config::ParameterCatalog;
use crate::data::{Observation, TimeSeriesData};
use crate::error::{ForecastError, Result};
use crate::models::{validate_request, Forecast, Predictor};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub mod artifact;
pub mod features;

pub use artifact::{OutputEnsemble, RegressionArtifact, RegressionTree, TreeEnsembleArtifact};
pub use features::{minute_grid, ResampledFrame};

/// Forecasts one channel of a multi-output regression artifact
#[derive(Debug, Clone)]
pub struct LearnedPredictor {
    /// Name of the model
    name: String,
    /// Pre-trained artifact, shared and never modified
    artifact: Arc<dyn RegressionArtifact>,
    /// Parameter key to output channel
    channels: BTreeMap<String, Channel>,
}

impl LearnedPredictor {
    /// Registry name of the model
    pub const NAME: &'static str = "XGBoost Multi-Output Predictor";

    /// Load the tree ensemble at `path` and map parameters through `catalog`.
    ///
    /// The artifact must produce an output for every tracked channel.
    pub fn load<P: AsRef<Path>>(path: P, catalog: &ParameterCatalog) -> Result<Self> {
        let path = path.as_ref();
        let artifact = TreeEnsembleArtifact::load(path)?;

        let outputs = artifact.output_names();
        if let Some(missing) = Channel::ALL
            .iter()
            .find(|channel| !outputs.contains(&channel.column()))
        {
            return Err(ForecastError::ArtifactLoad {
                path: path.to_path_buf(),
                reason: format!("artifact has no output for channel {}", missing.column()),
            });
        }

        Ok(Self::with_artifact(Arc::new(artifact), catalog))
    }

    /// Wrap an already constructed artifact
    pub fn with_artifact(artifact: Arc<dyn RegressionArtifact>, catalog: &ParameterCatalog) -> Self {
        Self {
            name: Self::NAME.to_string(),
            artifact,
            channels: catalog.channel_map(),
        }
    }

    /// Output channel for a parameter key
    pub fn channel_for(&self, parameter: &str) -> Result<Channel> {
        self.channels.get(parameter).copied().ok_or_else(|| {
            ForecastError::UnsupportedParameter(format!(
                "{} has no learned model output",
                parameter
            ))
        })
    }

    /// Readings feeding each channel: the primary series when it maps to the
    /// channel, otherwise any companion whose parameter does.
    fn channel_readings<'a>(
        &self,
        series: &'a TimeSeriesData,
    ) -> Vec<(Channel, &'a [Observation])> {
        let mut readings = Vec::new();
        for (parameter, &channel) in &self.channels {
            if let Some(observations) = series.readings_for(parameter) {
                readings.push((channel, observations));
            }
        }
        readings
    }
}

impl Predictor for LearnedPredictor {
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
        let target = self.channel_for(series.parameter())?;
        validate_request(horizon_hours, num_points)?;

        let training_points = series.split_at(cutoff).training.len();
        if training_points < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least 2 {} readings before the cutoff, got {}",
                series.parameter(),
                training_points
            )));
        }

        let frame = ResampledFrame::resample(&self.channel_readings(series))?;
        let history = frame.truncate_to(cutoff);
        let state = history.last_state().ok_or_else(|| {
            ForecastError::InsufficientData(format!("No resampled rows at or before {}", cutoff))
        })?;

        let timestamps = minute_grid(cutoff, horizon_hours, num_points)?;
        let inputs = features::carried_forward_features(&timestamps, &state)?;
        let outputs = self.artifact.predict(&inputs)?;

        let column = outputs.column(target.column()).map_err(|_| {
            ForecastError::Artifact(format!("Artifact produced no {} output", target.column()))
        })?;
        let values: Vec<f64> = column
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        if values.len() != num_points {
            return Err(ForecastError::Artifact(format!(
                "Artifact returned {} rows for {} inputs",
                values.len(),
                num_points
            )));
        }

        Forecast::new(timestamps, values)
    }
}
