//! Configuration: parameter catalog, forecast defaults and logging
//!
//! Loaded from a JSON file; every section falls back to the dashboard's
//! built-in defaults when omitted.

use crate::channel::Channel;
use crate::error::{ForecastError, Result};
use crate::models::{validate_request, DEFAULT_NUM_POINTS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub catalog: ParameterCatalog,
    pub forecast: ForecastSettings,
    pub logging: LoggingConfig,
}

impl ForecastConfig {
    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check forecast defaults are usable
    pub fn validate(&self) -> Result<()> {
        validate_request(self.forecast.default_horizon_hours, self.forecast.num_points)?;
        if self.catalog.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Parameter catalog must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Forecast request defaults and the learned model's artifact location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub default_horizon_hours: f64,
    pub num_points: usize,
    pub artifact_path: PathBuf,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            default_horizon_hours: 6.0,
            num_points: DEFAULT_NUM_POINTS,
            artifact_path: PathBuf::from("models/trained/multi_output_ensemble.json"),
        }
    }
}

/// Logging level and optional extra filter directives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            filter: None,
        }
    }
}

/// Display and mapping information of one sensor parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub unit: String,
    pub display_name: String,
    pub color: String,
    /// Learned model output channel, when the parameter is tracked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    /// Column holding this parameter in multisensor CSV exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
}

impl ParameterInfo {
    fn new(unit: &str, display_name: &str, color: &str) -> Self {
        Self {
            unit: unit.to_string(),
            display_name: display_name.to_string(),
            color: color.to_string(),
            channel: None,
            source_column: None,
        }
    }

    fn tracked(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    fn from_column(mut self, column: &str) -> Self {
        self.source_column = Some(column.to_string());
        self
    }
}

/// Read-only lookup from parameter key to its catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterCatalog {
    parameters: BTreeMap<String, ParameterInfo>,
}

impl ParameterCatalog {
    /// Catalog from explicit entries
    pub fn new(parameters: BTreeMap<String, ParameterInfo>) -> Self {
        Self { parameters }
    }

    /// Entry for `parameter`
    pub fn info(&self, parameter: &str) -> Result<&ParameterInfo> {
        self.parameters
            .get(parameter)
            .ok_or_else(|| ForecastError::UnsupportedParameter(parameter.to_string()))
    }

    /// Learned model channel of `parameter`
    pub fn channel_for(&self, parameter: &str) -> Result<Channel> {
        self.info(parameter)?.channel.ok_or_else(|| {
            ForecastError::UnsupportedParameter(format!(
                "{} has no learned model channel",
                parameter
            ))
        })
    }

    /// Every parameter with a learned model channel
    pub fn channel_map(&self) -> BTreeMap<String, Channel> {
        self.parameters
            .iter()
            .filter_map(|(key, info)| info.channel.map(|channel| (key.clone(), channel)))
            .collect()
    }

    /// Parameter keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterInfo)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the catalog has no parameters
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        let entries = [
            (
                "co2",
                ParameterInfo::new("ppm", "CO2", "#FF6B6B")
                    .tracked(Channel::Co2)
                    .from_column("SCD30_CO2"),
            ),
            (
                "temperature",
                ParameterInfo::new("°C", "Temperature", "#4ECDC4")
                    .tracked(Channel::Temperature)
                    .from_column("SCD30_Temperature"),
            ),
            (
                "humidity",
                ParameterInfo::new("%", "Humidity", "#45B7D1")
                    .tracked(Channel::Humidity)
                    .from_column("SCD30_Humidity"),
            ),
            (
                "pressure",
                ParameterInfo::new("hPa", "Pressure", "#96CEB4")
                    .tracked(Channel::Pressure)
                    .from_column("BME680_Pressure"),
            ),
            (
                "illuminance",
                ParameterInfo::new("lx", "Illuminance", "#F8C471").tracked(Channel::Illuminance),
            ),
            (
                "iaq",
                ParameterInfo::new("IAQ", "Indoor Air Quality", "#FFEAA7")
                    .from_column("BME680_IAQ"),
            ),
            (
                "voc",
                ParameterInfo::new("VOC", "Volatile Organic Compounds", "#DDA0DD")
                    .from_column("BME680_Breath_VOC_Equivalent"),
            ),
            (
                "gas_resistance",
                ParameterInfo::new("Ω", "Gas Resistance", "#98D8C8")
                    .from_column("BME680_Gas_Resistance"),
            ),
            (
                "co",
                ParameterInfo::new("ppm", "Carbon Monoxide", "#F7DC6F").from_column("MICS6814_CO"),
            ),
            (
                "nh3",
                ParameterInfo::new("ppm", "Ammonia", "#BB8FCE").from_column("MICS6814_NH3"),
            ),
            (
                "no2",
                ParameterInfo::new("ppm", "Nitrogen Dioxide", "#85C1E9")
                    .from_column("MICS6814_NO2"),
            ),
        ];

        Self {
            parameters: entries
                .into_iter()
                .map(|(key, info)| (key.to_string(), info))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_channels() {
        let catalog = ParameterCatalog::default();
        assert_eq!(catalog.channel_for("co2").unwrap(), Channel::Co2);
        assert_eq!(catalog.channel_map().len(), Channel::ALL.len());
        assert!(matches!(
            catalog.channel_for("voc"),
            Err(ForecastError::UnsupportedParameter(_))
        ));
        assert!(matches!(
            catalog.info("radon"),
            Err(ForecastError::UnsupportedParameter(_))
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ForecastConfig::from_json(r#"{"forecast": {"num_points": 12}}"#).unwrap();
        assert_eq!(config.forecast.num_points, 12);
        assert_eq!(config.forecast.default_horizon_hours, 6.0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.catalog, ParameterCatalog::default());
    }

    #[test]
    fn test_invalid_defaults_rejected() {
        let result = ForecastConfig::from_json(r#"{"forecast": {"num_points": 0}}"#);
        assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
    }
}
