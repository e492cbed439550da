//! Output channels of the learned multi-output model

use serde::{Deserialize, Serialize};
use std::fmt;

/// One tracked sensor parameter within the learned model's fixed schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Temperature,
    Humidity,
    Co2,
    Pressure,
    Illuminance,
}

impl Channel {
    /// Every tracked channel, in schema order
    pub const ALL: [Channel; 5] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Co2,
        Channel::Pressure,
        Channel::Illuminance,
    ];

    /// Column name of this channel in the artifact's feature and output frames
    pub fn column(self) -> &'static str {
        match self {
            Channel::Temperature => "currentEnvironmentTemperature",
            Channel::Humidity => "humidityLevel",
            Channel::Co2 => "carbonDioxidePPM",
            Channel::Pressure => "airPressure",
            Channel::Illuminance => "currentIlluminance",
        }
    }

    /// Position of this channel in [`Channel::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Temperature => "temperature",
            Channel::Humidity => "humidity",
            Channel::Co2 => "co2",
            Channel::Pressure => "pressure",
            Channel::Illuminance => "illuminance",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_order() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
        assert_eq!(Channel::Co2.column(), "carbonDioxidePPM");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Channel::Co2).unwrap();
        assert_eq!(json, "\"co2\"");
        let parsed: Channel = serde_json::from_str("\"illuminance\"").unwrap();
        assert_eq!(parsed, Channel::Illuminance);
    }
}
